use eframe::egui::{
    self, Align, Align2, Color32, CornerRadius, FontId, Frame, Layout, Margin, RichText, ScrollArea,
    Sense, Stroke, TextureHandle, TextureOptions, Vec2, load::SizedTexture,
};

use chrono::Utc;
use egui_extras::DatePickerButton;

use crate::error::AppError;
use crate::form::FormState;
use crate::logo::{self, IMAGE_EXTENSIONS, LogoFile};
use crate::model::{Currency, DATE_FORMAT, Field, InvoiceForm};
use crate::preview::{LogoBadge, Preview};
use crate::settings::WindowSettings;

// ==========================================
// Palette
// ==========================================
const PAGE: Color32 = Color32::from_rgb(15, 23, 42);
const PANEL: Color32 = Color32::from_rgb(22, 32, 52);
const CARD: Color32 = Color32::from_rgb(30, 41, 59);
const INSET: Color32 = Color32::from_rgb(17, 24, 39);
const BORDER: Color32 = Color32::from_rgb(51, 65, 85);
const ACCENT: Color32 = Color32::from_rgb(52, 211, 153);
const ACCENT_SOFT: Color32 = Color32::from_rgb(167, 243, 208);
const TEXT: Color32 = Color32::from_rgb(241, 245, 249);
const LABEL: Color32 = Color32::from_rgb(226, 232, 240);
const MUTED: Color32 = Color32::from_rgb(148, 163, 184);
const ERROR: Color32 = Color32::from_rgb(252, 165, 165);

const BADGE_SIZE: f32 = 48.0;

pub fn run(form: InvoiceForm, window: &WindowSettings) -> Result<(), AppError> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Instant Invoice")
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([760.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "instant-invoice",
        options,
        Box::new(move |cc| Ok(Box::new(InvoiceApp::new(cc, form)))),
    )?;
    Ok(())
}

pub struct InvoiceApp {
    state: FormState<TextureHandle>,
    scroll_to_top: bool,
}

impl InvoiceApp {
    fn new(cc: &eframe::CreationContext<'_>, form: InvoiceForm) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            state: FormState::new(form),
            scroll_to_top: false,
        }
    }

    fn upload(&mut self, ctx: &egui::Context, file: LogoFile) {
        self.state.upload_logo(&file, |file| {
            let image = logo::decode(file)?;
            Ok(ctx.load_texture(format!("logo:{}", file.name), image, TextureOptions::LINEAR))
        });
    }

    /// Only the first of several dropped files is used.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        if let Some(file) = dropped.as_ref().and_then(LogoFile::from_dropped) {
            self.upload(ctx, file);
        }
    }

    fn form_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Invoice Details").size(18.0).strong().color(TEXT));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                chip(ui, "GENERATOR", MUTED);
            });
        });
        ui.add_space(14.0);

        self.logo_drop_zone(ui);
        ui.add_space(14.0);

        let state = &mut self.state;
        ui.columns(2, |columns| {
            text_field(&mut columns[0], state, Field::Sender, "Your name or company", "Acme Studio");
            text_field(&mut columns[1], state, Field::Client, "Client", "Client Name");
            text_field(&mut columns[0], state, Field::InvoiceNo, "Invoice #", "INV-2025-001");
            currency_select(&mut columns[1], state);
            date_field(&mut columns[0], state, Field::IssueDate, "Issue date", "Not set");
            date_field(&mut columns[1], state, Field::DueDate, "Due date", "Flexible");
        });

        text_field(ui, state, Field::Service, "Service provided", "UI/UX design sprint");
        text_field(ui, state, Field::Price, "Price", "1200");

        ui.label(RichText::new("Notes").color(LABEL));
        let mut notes = state.form().notes.clone();
        let edit = egui::TextEdit::multiline(&mut notes)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .hint_text("Payment is due within 14 days. Thank you for your business.");
        if ui.add(edit).changed() {
            state.update(Field::Notes, notes);
        }
        ui.add_space(16.0);

        let generate = egui::Button::new(RichText::new("GENERATE INVOICE").strong().color(PAGE))
            .fill(ACCENT)
            .corner_radius(CornerRadius::same(14))
            .min_size(Vec2::new(ui.available_width(), 42.0));
        if ui.add(generate).clicked() {
            state.dismiss_logo_error();
            self.scroll_to_top = true;
            ui.ctx().request_repaint();
        }
    }

    fn logo_drop_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if hovering {
            Stroke::new(1.5, ACCENT)
        } else {
            Stroke::new(1.0, BORDER)
        };

        let mut browse = false;
        let mut clear = false;
        Frame::new()
            .fill(INSET)
            .stroke(stroke)
            .corner_radius(CornerRadius::same(16))
            .inner_margin(Margin::same(14))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(BADGE_SIZE), Sense::hover());
                    ui.painter().rect_filled(rect, CornerRadius::same(12), ACCENT);
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "⬆",
                        FontId::proportional(20.0),
                        PAGE,
                    );

                    ui.vertical(|ui| {
                        ui.label(RichText::new("Drop or upload your logo").strong().color(TEXT));
                        ui.label(
                            RichText::new("PNG, JPG, SVG up to 5 MB. Drag & drop or click to browse.")
                                .small()
                                .color(MUTED),
                        );
                        if !self.state.logo_name().is_empty() {
                            ui.label(RichText::new(self.state.logo_name()).small().color(ACCENT_SOFT));
                        }
                        if let Some(err) = self.state.logo_error() {
                            ui.label(RichText::new(err.to_string()).small().color(ERROR));
                        }
                        ui.horizontal(|ui| {
                            browse = ui.button("Browse…").clicked();
                            if self.state.logo().is_some() {
                                clear = ui.button("Clear").clicked();
                            }
                        });
                    });
                });
            });

        if browse {
            let picked = rfd::FileDialog::new()
                .set_title("Select Logo")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file();
            if let Some(path) = picked {
                self.upload(ui.ctx(), LogoFile::from_path(&path));
            }
        }
        if clear {
            self.state.clear_logo();
        }
    }

    fn preview_panel(&self, ui: &mut egui::Ui) {
        let preview = Preview::render(&self.state);

        card(ui, CARD, |ui| {
            ui.horizontal(|ui| {
                logo_badge(ui, &preview.badge, self.state.logo());
                ui.vertical(|ui| {
                    ui.label(RichText::new("INVOICE").small().color(MUTED));
                    ui.label(RichText::new(&preview.sender).size(18.0).strong().color(TEXT));
                });
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    chip(ui, preview.currency.code(), ACCENT_SOFT);
                });
            });
            ui.add_space(24.0);

            card(ui, INSET, |ui| {
                egui::Grid::new("preview-meta")
                    .num_columns(2)
                    .spacing([64.0, 16.0])
                    .show(ui, |ui| {
                        meta(ui, "INVOICE #", &preview.invoice_no);
                        meta(ui, "ISSUE DATE", &preview.issue_date);
                        ui.end_row();
                        meta(ui, "DUE DATE", &preview.due_date);
                        meta(ui, "BILL TO", &preview.client);
                        ui.end_row();
                    });
            });
            ui.add_space(18.0);

            card(ui, PANEL, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new("SERVICE").small().color(MUTED));
                        ui.label(RichText::new(&preview.service).size(16.0).strong().color(TEXT));
                    });
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(&preview.price).size(16.0).strong().color(ACCENT_SOFT));
                    });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Total").color(LABEL));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(&preview.total).size(22.0).strong().color(TEXT));
                    });
                });
            });
            ui.add_space(18.0);

            card(ui, INSET, |ui| {
                ui.label(RichText::new("NOTES").small().color(MUTED));
                ui.add_space(6.0);
                ui.label(RichText::new(&preview.notes).color(LABEL));
            });
            ui.add_space(18.0);

            ui.horizontal_wrapped(|ui| {
                for label in ["INSTANT PREVIEW", "PRINT READY", "SHAREABLE"] {
                    chip(ui, label, MUTED);
                }
            });
        });
    }
}

impl eframe::App for InvoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        let rewind = std::mem::take(&mut self.scroll_to_top);

        egui::TopBottomPanel::top("header")
            .frame(Frame::new().fill(PAGE).inner_margin(Margin::symmetric(24, 18)))
            .show(ctx, header);

        egui::SidePanel::left("details")
            .frame(Frame::new().fill(PANEL).inner_margin(Margin::same(20)))
            .default_width(420.0)
            .show(ctx, |ui| {
                let mut area = ScrollArea::vertical().id_salt("details-scroll");
                if rewind {
                    area = area.vertical_scroll_offset(0.0);
                }
                area.show(ui, |ui| self.form_panel(ui));
            });

        egui::CentralPanel::default()
            .frame(Frame::new().fill(PAGE).inner_margin(Margin::same(24)))
            .show(ctx, |ui| {
                let mut area = ScrollArea::vertical().id_salt("preview-scroll");
                if rewind {
                    area = area.vertical_scroll_offset(0.0);
                }
                area.show(ui, |ui| self.preview_panel(ui));
            });
    }
}

// ==========================================
// Widgets
// ==========================================

fn header(ui: &mut egui::Ui) {
    ui.label(RichText::new("INSTANT INVOICE").small().strong().color(MUTED));
    ui.label(
        RichText::new("Drop your logo, add a service and price, and ship a polished invoice in seconds.")
            .size(24.0)
            .strong()
            .color(Color32::WHITE),
    );
    ui.label(
        RichText::new("Live preview updates as you type. Export-ready layout that looks sharp on screens and print.")
            .color(MUTED),
    );
}

fn text_field<L>(ui: &mut egui::Ui, state: &mut FormState<L>, field: Field, label: &str, hint: &str) {
    ui.label(RichText::new(label).color(LABEL));
    let mut value = state.form().get(field).to_owned();
    let edit = egui::TextEdit::singleline(&mut value)
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    if ui.add(edit).changed() {
        state.update(field, value);
    }
    ui.add_space(10.0);
}

/// Calendar picker writing `YYYY-MM-DD`; Clear empties the field.
fn date_field<L>(ui: &mut egui::Ui, state: &mut FormState<L>, field: Field, label: &str, empty: &str) {
    ui.label(RichText::new(label).color(LABEL));
    let current = state.form().date(field);
    ui.horizontal(|ui| {
        let mut picked = current.unwrap_or_else(|| Utc::now().date_naive());
        let id = format!("{field:?}-picker");
        let picker = DatePickerButton::new(&mut picked)
            .id_salt(&id)
            .format(DATE_FORMAT);
        if ui.add(picker).changed() {
            state.set_date(field, Some(picked));
        }

        if state.form().get(field).is_empty() {
            ui.label(RichText::new(empty).small().color(MUTED));
        } else if ui.small_button("Clear").clicked() {
            state.set_date(field, None);
        }
    });
    ui.add_space(10.0);
}

fn currency_select<L>(ui: &mut egui::Ui, state: &mut FormState<L>) {
    ui.label(RichText::new("Currency").color(LABEL));
    let mut currency = state.form().currency;
    egui::ComboBox::from_id_salt("currency")
        .selected_text(currency.code())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for option in Currency::ALL {
                ui.selectable_value(&mut currency, option, option.code());
            }
        });
    if currency != state.form().currency {
        state.set_currency(currency);
    }
    ui.add_space(10.0);
}

fn logo_badge(ui: &mut egui::Ui, badge: &LogoBadge, texture: Option<&TextureHandle>) {
    let size = Vec2::splat(BADGE_SIZE);
    match (badge, texture) {
        (LogoBadge::Image { .. }, Some(texture)) => {
            let image = egui::Image::from_texture(SizedTexture::from_handle(texture))
                .fit_to_exact_size(size)
                .corner_radius(CornerRadius::same(12));
            ui.add(image);
        }
        (LogoBadge::Monogram { initials }, _) => {
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            ui.painter().rect_filled(rect, CornerRadius::same(12), ACCENT);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                initials,
                FontId::proportional(18.0),
                PAGE,
            );
        }
        (LogoBadge::Image { .. }, None) => {
            ui.allocate_exact_size(size, Sense::hover());
        }
    }
}

fn chip(ui: &mut egui::Ui, text: &str, color: Color32) {
    Frame::new()
        .fill(Color32::from_white_alpha(12))
        .stroke(Stroke::new(1.0, BORDER))
        .corner_radius(CornerRadius::same(255))
        .inner_margin(Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().strong().color(color));
        });
}

fn meta(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().color(MUTED));
        ui.label(RichText::new(value).strong().color(TEXT));
    });
}

fn card(ui: &mut egui::Ui, fill: Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, BORDER))
        .corner_radius(CornerRadius::same(18))
        .inner_margin(Margin::same(18))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}
