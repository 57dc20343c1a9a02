//! The airdrop form view: token address, recipient and amount lists, live
//! totals and gas estimate, and the submission trigger.

use crate::config;
use crate::gui::app::GuiApp;
use crate::gui::helpers::{format_token_amount, shorten_address, tx_hash_hex};
use crate::gui::notifications::{push_notification, NotificationEntry};
use crate::import;
use crate::parse;
use crate::sender;
use eframe::egui::{self, RichText};

impl GuiApp {
    /// Render the airdrop form view
    pub(crate) fn view_airdrop_form(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "[>>]", "SEND YOUR AIRDROP");
        ui.add_space(self.theme.spacing_sm);

        let mut edited = false;

        ui.label("Token Address:");
        if ui
            .add(egui::TextEdit::singleline(&mut self.form.token_address).hint_text("0x..."))
            .changed()
        {
            edited = true;
        }
        ui.add_space(self.theme.spacing_sm);

        ui.label("Recipients (comma or newline separated):");
        if ui
            .add(
                egui::TextEdit::multiline(&mut self.form.recipients)
                    .hint_text("0x..., 0x..., 0x...")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            )
            .changed()
        {
            edited = true;
        }
        ui.add_space(self.theme.spacing_sm);

        ui.label("Amounts (token units; comma or newline separated):");
        if ui
            .add(
                egui::TextEdit::multiline(&mut self.form.amounts)
                    .hint_text("100, 200, 300")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            )
            .changed()
        {
            edited = true;
        }

        let mut pick_csv = false;
        ui.horizontal(|ui| {
            if ui
                .add(self.theme.button_secondary("Import CSV..."))
                .clicked()
            {
                pick_csv = true;
            }
            ui.label(
                RichText::new("rows of `recipient,amount`")
                    .italics()
                    .size(11.0)
                    .color(self.theme.text_secondary),
            );
        });

        if edited {
            self.mark_form_edited();
        }
        if pick_csv {
            self.import_csv();
        }

        ui.add_space(self.theme.spacing_md);
        self.render_airdrop_details(ui);
        ui.add_space(self.theme.spacing_md);
        self.render_submit_section(ui);
    }

    fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };

        match import::read_recipients_csv(&path) {
            Ok(lists) => {
                self.form.recipients = lists.recipients;
                self.form.amounts = lists.amounts;
                self.mark_form_edited();
                push_notification(
                    &mut self.notifications,
                    NotificationEntry::info(format!("Imported {}", path.display())),
                );
            }
            Err(e) => {
                push_notification(
                    &mut self.notifications,
                    NotificationEntry::error(format!("CSV import failed: {}", e)),
                );
            }
        }
    }

    fn render_airdrop_details(&mut self, ui: &mut egui::Ui) {
        let decimals = self.form.decimals();
        // Live preview mirrors the lenient estimation path: bad entries show
        // as a smaller total, never as an error.
        let amounts = parse::parse_amounts_lenient(&self.form.amounts, decimals);
        let recipient_count = parse::parse_list(&self.form.recipients).len();
        let total = parse::total(&amounts).unwrap_or_default();

        egui::Frame::group(ui.style())
            .fill(self.theme.surface)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("AIRDROP DETAILS")
                        .color(self.theme.primary)
                        .strong(),
                );
                ui.add_space(self.theme.spacing_xs);

                let (token_name, token_symbol) = match &self.form.token {
                    Some(token) => (token.name.as_str(), token.symbol.as_str()),
                    None => ("N/A", "Token"),
                };
                ui.label(format!("Token Name: {}", token_name));
                ui.label(format!(
                    "Total Amount ({}): {}",
                    token_symbol,
                    format_token_amount(total, decimals)
                ));
                ui.label(format!("Total Amount (base units): {}", total));
                ui.label(format!("Recipients: {}", recipient_count));

                let gas_text = match self.form.estimated_gas {
                    Some(gas) => format!("{} gas units", gas),
                    None => "N/A".to_string(),
                };
                ui.label(format!("Estimated Gas: {}", gas_text));

                ui.add_space(self.theme.spacing_xs);
                self.render_sender_status(ui);
            });
    }

    fn render_sender_status(&self, ui: &mut egui::Ui) {
        match sender::sender_address(self.config.chain_id) {
            Some(contract) => {
                let (status_text, color) = match self.form.sender_check {
                    Some(true) => ("compatible", self.theme.success),
                    Some(false) => ("missing airdropERC20", self.theme.error),
                    None => ("checking...", self.theme.text_secondary),
                };
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "Sender contract: {} ({})",
                        shorten_address(contract),
                        self.config.network_label()
                    ));
                    ui.label(RichText::new(status_text).color(color).size(11.0));
                });
            }
            None => {
                ui.label(
                    RichText::new(format!(
                        "No airdrop sender contract on {} - submission is disabled",
                        self.config.network_label()
                    ))
                    .color(self.theme.warning),
                );
            }
        }
    }

    fn render_submit_section(&mut self, ui: &mut egui::Ui) {
        let submitting = self.form.is_submitting();
        let can_submit = !submitting && self.session.is_some();

        let mut submit_clicked = false;
        ui.horizontal(|ui| {
            let label = if submitting {
                "Processing..."
            } else {
                "Submit Airdrop"
            };
            if ui
                .add_enabled(can_submit, self.theme.button_primary(label))
                .clicked()
            {
                submit_clicked = true;
            }
            if submitting {
                ui.spinner();
                if let Some(phase) = &self.form.submit_phase {
                    ui.label(
                        RichText::new(phase.display_text()).color(self.theme.text_secondary),
                    );
                }
            }
        });
        if submit_clicked {
            self.start_submission();
        }

        if let Some(status) = &self.form.status {
            let color = if status.starts_with("[OK]") {
                self.theme.success
            } else {
                self.theme.error
            };
            ui.add_space(self.theme.spacing_xs);
            ui.label(RichText::new(status).color(color));
        }

        let mut open_url: Option<String> = None;
        if let Some(receipt) = &self.form.last_receipt {
            let hash_text = tx_hash_hex(receipt.tx_hash);
            ui.label(format!("Tx: {}", hash_text));
            if let Some(url) = config::get_tx_explorer_url(self.config.chain_id, &hash_text) {
                if ui
                    .add(self.theme.button_secondary("View on explorer"))
                    .clicked()
                {
                    open_url = Some(url);
                }
            }
        }
        if let Some(url) = open_url {
            if let Err(e) = open::that(&url) {
                push_notification(
                    &mut self.notifications,
                    NotificationEntry::error(format!("Could not open browser: {}", e)),
                );
            }
        }
    }
}
