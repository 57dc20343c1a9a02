//! Main GUI application module
//!
//! Contains the GuiApp struct, the airdrop form state, and the frame loop.

use crate::{
    airdrop::{self, FormSnapshot, SubmitPhase},
    config::{Config, NETWORKS},
    draft::Draft,
    erc20,
    estimate::{Debouncer, GenerationGate},
    sender,
    types::{AirdropReceipt, TokenDescriptor},
    wallet::{self, WalletSession},
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use ethers::types::U256;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Builder;

use super::async_job::AsyncJob;
use super::helpers::shorten_address;
use super::notifications::{push_notification, NotificationEntry};
use super::theme::{configure_style, AppTheme};

/// Idle delay before re-running gas estimation while the user is typing.
pub(crate) const ESTIMATE_DEBOUNCE: Duration = Duration::from_millis(800);

/// State for the airdrop form view.
pub(crate) struct AirdropFormState {
    // Raw text fields, persisted as the draft
    pub(crate) token_address: String,
    pub(crate) recipients: String,
    pub(crate) amounts: String,

    // Token metadata, fetched once per token address
    pub(crate) token: Option<TokenDescriptor>,
    pub(crate) token_job: Option<AsyncJob<TokenDescriptor>>,
    pub(crate) token_fetched_for: Option<String>,

    // Debounced gas estimation
    pub(crate) estimated_gas: Option<U256>,
    pub(crate) estimate_job: Option<(u64, AsyncJob<Option<U256>>)>,
    pub(crate) estimate_generations: GenerationGate,
    pub(crate) debouncer: Debouncer,

    // One-shot submission; the in-flight job doubles as the busy flag
    pub(crate) submit_job: Option<AsyncJob<AirdropReceipt>>,
    pub(crate) submit_phase: Option<SubmitPhase>,
    pub(crate) phase_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<SubmitPhase>>,
    pub(crate) last_receipt: Option<AirdropReceipt>,
    pub(crate) status: Option<String>,

    // Whether the configured sender contract carries the airdropERC20 selector
    pub(crate) sender_check: Option<bool>,
    pub(crate) sender_check_job: Option<AsyncJob<bool>>,
}

impl AirdropFormState {
    fn from_draft(draft: Draft) -> Self {
        Self {
            token_address: draft.token_address,
            recipients: draft.recipients,
            amounts: draft.amounts,
            token: None,
            token_job: None,
            token_fetched_for: None,
            estimated_gas: None,
            estimate_job: None,
            estimate_generations: GenerationGate::new(),
            debouncer: Debouncer::new(ESTIMATE_DEBOUNCE),
            submit_job: None,
            submit_phase: None,
            phase_receiver: None,
            last_receipt: None,
            status: None,
            sender_check: None,
            sender_check_job: None,
        }
    }

    pub(crate) fn draft(&self) -> Draft {
        Draft {
            token_address: self.token_address.clone(),
            recipients: self.recipients.clone(),
            amounts: self.amounts.clone(),
        }
    }

    /// The submission trigger stays disabled while an attempt is in flight.
    pub(crate) fn is_submitting(&self) -> bool {
        self.submit_job.is_some()
    }

    /// Decimals of the currently known token, 18 until metadata arrives.
    pub(crate) fn decimals(&self) -> u8 {
        self.token.as_ref().map(|t| t.decimals).unwrap_or(18)
    }

    /// Drop per-network data when the network changes.
    fn reset_network_state(&mut self) {
        self.estimated_gas = None;
        self.estimate_job = None;
        self.token = None;
        self.token_job = None;
        self.token_fetched_for = None;
        self.sender_check = None;
        self.sender_check_job = None;
        self.last_receipt = None;
        self.status = None;
    }
}

pub struct GuiApp {
    pub(crate) config: Config,
    pub(crate) theme: AppTheme,
    pub(crate) session: Option<WalletSession>,
    pub(crate) session_job: Option<AsyncJob<Option<WalletSession>>>,
    pub(crate) form: AirdropFormState,
    pub(crate) notifications: VecDeque<NotificationEntry>,
}

impl GuiApp {
    pub fn new(config: Config, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let mut app = Self {
            config,
            theme,
            session: None,
            session_job: None,
            form: AirdropFormState::from_draft(Draft::load()),
            notifications: VecDeque::new(),
        };
        app.connect_session();
        app.refresh_sender_check();
        // A restored draft should produce an estimate without further edits
        app.form.debouncer.mark_edit(Instant::now());
        app
    }

    pub(crate) fn spawn_job<T, FutBuilder, Fut>(&self, builder: FutBuilder) -> AsyncJob<T>
    where
        T: Send + 'static,
        FutBuilder: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T>> + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(builder()),
                Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
            };
            let _ = tx.send(result);
        });
        AsyncJob::new(rx)
    }

    /// Switch to another built-in network and rebuild per-network state.
    pub(crate) fn set_network(&mut self, index: usize) {
        let network = &NETWORKS[index];
        if network.chain_id == self.config.chain_id {
            return;
        }
        self.config = Config::from_network(network);
        self.session = None;
        self.form.reset_network_state();
        self.connect_session();
        self.refresh_sender_check();
        self.form.debouncer.mark_edit(Instant::now());
        push_notification(
            &mut self.notifications,
            NotificationEntry::info(format!("Switched to {}", network.label)),
        );
    }

    fn connect_session(&mut self) {
        let config = self.config.clone();
        self.session_job = Some(self.spawn_job(move || async move { wallet::connect(&config).await }));
    }

    fn refresh_sender_check(&mut self) {
        let Some(contract) = sender::sender_address(self.config.chain_id) else {
            self.form.sender_check = None;
            self.form.sender_check_job = None;
            return;
        };
        let config = self.config.clone();
        self.form.sender_check_job = Some(self.spawn_job(move || async move {
            let provider = config.get_provider().await?;
            sender::check_sender_compatible(&provider, contract).await
        }));
    }

    /// Record an edit: restart the estimation debounce window and persist the
    /// draft.
    pub(crate) fn mark_form_edited(&mut self) {
        self.form.debouncer.mark_edit(Instant::now());
        if let Err(e) = self.form.draft().save() {
            tracing::warn!("Failed to save draft: {}", e);
        }
    }

    fn poll_jobs(&mut self) {
        // Wallet session
        if let Some(job) = &mut self.session_job {
            if let Some(result) = job.poll() {
                match result {
                    Ok(Some(session)) => {
                        push_notification(
                            &mut self.notifications,
                            NotificationEntry::info(format!(
                                "Wallet connected: {}",
                                shorten_address(session.address)
                            )),
                        );
                        self.session = Some(session);
                        // Metadata and estimation depend on the connected
                        // account; re-run both now that it exists
                        self.form.token_fetched_for = None;
                        self.form.debouncer.mark_edit(Instant::now());
                    }
                    Ok(None) => {
                        self.session = None;
                        push_notification(
                            &mut self.notifications,
                            NotificationEntry::info(format!(
                                "No {} set - running read-only",
                                wallet::PRIVATE_KEY_ENV
                            )),
                        );
                    }
                    Err(e) => {
                        self.session = None;
                        push_notification(
                            &mut self.notifications,
                            NotificationEntry::error(format!("Wallet connection failed: {}", e)),
                        );
                    }
                }
                self.session_job = None;
            }
        }

        // Token metadata
        if let Some(job) = &mut self.form.token_job {
            if let Some(result) = job.poll() {
                self.form.token = result.ok();
                self.form.token_job = None;
            }
        }

        // Gas estimate: apply only the newest generation's result
        if let Some((generation, job)) = &mut self.form.estimate_job {
            if let Some(result) = job.poll() {
                if self.form.estimate_generations.admit(*generation) {
                    self.form.estimated_gas = result.ok().flatten();
                }
                self.form.estimate_job = None;
            }
        }

        // Sender contract compatibility
        if let Some(job) = &mut self.form.sender_check_job {
            if let Some(result) = job.poll() {
                self.form.sender_check = result.ok();
                self.form.sender_check_job = None;
            }
        }

        // Submission phase stream
        if let Some(receiver) = &mut self.form.phase_receiver {
            while let Ok(phase) = receiver.try_recv() {
                self.form.submit_phase = Some(phase);
            }
        }

        // Submission outcome. Clearing the job here is what re-enables the
        // trigger; it happens on success, failure, and worker death alike.
        if let Some(job) = &mut self.form.submit_job {
            if let Some(result) = job.poll() {
                self.form.submit_job = None;
                self.form.phase_receiver = None;
                self.form.submit_phase = None;
                match result {
                    Ok(receipt) => {
                        self.form.status = Some(format!(
                            "[OK] Airdrop confirmed in block {}",
                            receipt
                                .block_number
                                .map(|n| n.to_string())
                                .unwrap_or_else(|| "?".to_string())
                        ));
                        push_notification(
                            &mut self.notifications,
                            NotificationEntry::success(format!(
                                "Airdrop successful! Recorded in {}",
                                crate::operation_log::log_file_path()
                            )),
                        );
                        self.form.last_receipt = Some(receipt);
                    }
                    Err(e) => {
                        self.form.status = Some(format!("[!!] Failed: {}", e));
                        push_notification(
                            &mut self.notifications,
                            NotificationEntry::error(format!("Airdrop failed: {}", e)),
                        );
                    }
                }
            }
        }
    }

    /// Fetch token metadata when the token address settles on a new value.
    fn maybe_fetch_token(&mut self) {
        let key = self.form.token_address.trim().to_string();
        if self.form.token_fetched_for.as_ref() == Some(&key) || self.form.token_job.is_some() {
            return;
        }

        if key.is_empty() || self.session.is_none() {
            self.form.token = None;
            self.form.token_fetched_for = Some(key);
            return;
        }

        match key.parse::<ethers::types::Address>() {
            Ok(token) => {
                let config = self.config.clone();
                self.form.token_job = Some(self.spawn_job(move || async move {
                    let provider = config.get_provider().await?;
                    Ok(erc20::fetch_token_descriptor(&provider, token).await)
                }));
            }
            Err(_) => {
                self.form.token = None;
            }
        }
        self.form.token_fetched_for = Some(key);
    }

    /// Fire a debounced estimation attempt once the idle window elapses.
    fn maybe_spawn_estimate(&mut self) {
        if !self.form.debouncer.ready(Instant::now()) {
            return;
        }

        let generation = self.form.estimate_generations.next();
        let config = self.config.clone();
        let from = self.session.as_ref().map(|s| s.address);
        let snapshot = self.form_snapshot();
        let job = self.spawn_job(move || async move {
            Ok(airdrop::estimate_gas(config, from, snapshot).await)
        });
        self.form.estimate_job = Some((generation, job));
    }

    pub(crate) fn form_snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            token_address: self.form.token_address.clone(),
            recipients_raw: self.form.recipients.clone(),
            amounts_raw: self.form.amounts.clone(),
            decimals: self.form.decimals(),
        }
    }

    /// Kick off one submission attempt. The busy flag (the in-flight job)
    /// suppresses a second concurrent attempt.
    pub(crate) fn start_submission(&mut self) {
        if self.form.is_submitting() {
            return;
        }
        let Some(session) = self.session.clone() else {
            push_notification(
                &mut self.notifications,
                NotificationEntry::error("No wallet connected"),
            );
            return;
        };

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        self.form.phase_receiver = Some(rx);
        self.form.status = None;
        self.form.last_receipt = None;

        let config = self.config.clone();
        let snapshot = self.form_snapshot();
        self.form.submit_job = Some(self.spawn_job(move || async move {
            airdrop::run(config, session, snapshot, tx)
                .await
                .map_err(anyhow::Error::from)
        }));
    }

    pub(crate) fn render_section_header(&self, ui: &mut egui::Ui, tag: &str, title: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(tag).color(self.theme.warning).strong());
            ui.label(RichText::new(title).color(self.theme.primary).strong().size(18.0));
        });
        ui.separator();
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("TSEND v{}", env!("CARGO_PKG_VERSION")))
                    .color(self.theme.primary)
                    .strong(),
            );
            ui.add_space(self.theme.spacing_md);

            ui.label("Network:");
            let mut selected: Option<usize> = None;
            egui::ComboBox::from_id_source("network_selector")
                .selected_text(self.config.network_label().to_string())
                .show_ui(ui, |ui| {
                    for (index, network) in NETWORKS.iter().enumerate() {
                        let is_current = network.chain_id == self.config.chain_id;
                        if ui.selectable_label(is_current, network.label).clicked() {
                            selected = Some(index);
                        }
                    }
                });
            if let Some(index) = selected {
                self.set_network(index);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match &self.session {
                    Some(session) => {
                        ui.label(
                            RichText::new(shorten_address(session.address))
                                .color(self.theme.success),
                        );
                        ui.label("Account:");
                    }
                    None => {
                        ui.label(RichText::new("read-only").color(self.theme.warning));
                    }
                }
            });
        });
    }

    fn render_notifications(&mut self, ui: &mut egui::Ui) {
        let entries: Vec<NotificationEntry> =
            self.notifications.iter().rev().take(3).cloned().collect();
        for entry in entries {
            let color = match entry.level {
                super::notifications::NotificationLevel::Info => self.theme.text_secondary,
                super::notifications::NotificationLevel::Success => self.theme.success,
                super::notifications::NotificationLevel::Error => self.theme.error,
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new(entry.time_ago()).color(self.theme.text_secondary).size(11.0));
                ui.label(RichText::new(&entry.message).color(color).size(12.0));
            });
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();
        self.maybe_fetch_token();
        self.maybe_spawn_estimate();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_xs);
            self.render_top_bar(ui);
            ui.add_space(self.theme.spacing_xs);
        });

        egui::TopBottomPanel::bottom("notifications").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_xs);
            self.render_notifications(ui);
            ui.add_space(self.theme.spacing_xs);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.view_airdrop_form(ui);
            });
        });

        // Keep polling background jobs and the debounce timer
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

pub fn launch(config: Config) -> Result<()> {
    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config.clone(), &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default().with_inner_size([900.0, 720.0]);

    let native_options = NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Tsend - Batch ERC20 Airdrop Utility",
        native_options,
        Box::new(app_creator),
    )
    .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
