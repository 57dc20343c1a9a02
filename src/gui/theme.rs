//! Centralized theme and styling for the GUI.

use eframe::egui;

/// Color and spacing constants shared by all views.
#[derive(Clone, Copy)]
pub struct AppTheme {
    // Base colors
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub surface_active: egui::Color32,
    pub panel_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    // Semantic colors
    pub primary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Spacing scale
    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    // Button sizes
    pub button_medium: egui::Vec2,
    pub button_large: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Dark background with bright green accents
            background: egui::Color32::from_rgb(8, 8, 8),
            surface: egui::Color32::from_rgb(15, 15, 15),
            surface_hover: egui::Color32::from_rgb(25, 25, 25),
            surface_active: egui::Color32::from_rgb(35, 35, 35),
            panel_fill: egui::Color32::from_rgb(12, 12, 12),
            text_primary: egui::Color32::from_rgb(0, 221, 119),
            text_secondary: egui::Color32::from_rgb(170, 170, 170),

            primary: egui::Color32::from_rgb(0, 221, 119),
            success: egui::Color32::from_rgb(0, 221, 119),
            warning: egui::Color32::from_rgb(255, 170, 0),
            error: egui::Color32::from_rgb(255, 85, 85),

            spacing_xs: 6.0,
            spacing_sm: 12.0,
            spacing_md: 20.0,
            spacing_lg: 28.0,

            button_medium: egui::vec2(140.0, 36.0),
            button_large: egui::vec2(180.0, 44.0),
        }
    }
}

impl AppTheme {
    /// Create a themed button with consistent sizing and colors
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(
            egui::RichText::new(text)
                .color(self.text_primary)
                .strong(),
        )
        .fill(self.surface)
        .stroke(egui::Stroke::new(3.0, self.primary))
        .min_size(self.button_large)
    }

    /// Create a themed button for secondary actions
    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.surface)
            .stroke(egui::Stroke::new(2.0, self.text_secondary))
            .min_size(self.button_medium)
    }
}

/// Apply the theme to the egui context.
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.panel_fill;
    visuals.override_text_color = Some(theme.text_primary);

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface;
    visuals.widgets.hovered.bg_fill = theme.surface_hover;
    visuals.widgets.active.bg_fill = theme.surface_active;
    visuals.widgets.open.bg_fill = theme.surface_active;

    // Outline text inputs so they stand out against the dark surface
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(2.0, theme.primary);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(2.0, theme.primary);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(3.0, theme.primary);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    ctx.set_style(style);
}
