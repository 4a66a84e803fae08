use serde::Serialize;
use tera::{Context, Tera};

use crate::form::FormState;
use crate::model::Currency;
use crate::money::format_money;

const TEXT_TEMPLATE: &str = include_str!("../templates/preview.tera");

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogoBadge {
    Image { name: String },
    Monogram { initials: String },
}

/// What the invoice preview shows, derived from the form on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub sender: String,
    pub client: String,
    pub service: String,
    pub notes: String,
    pub currency: Currency,
    pub invoice_no: String,
    pub issue_date: String,
    pub due_date: String,
    pub price: String,
    pub total: String,
    pub badge: LogoBadge,
}

impl Preview {
    pub fn render<L>(state: &FormState<L>) -> Self {
        let form = state.form();
        let price = format_money(&form.price, form.currency);
        let badge = match state.logo() {
            Some(_) => LogoBadge::Image {
                name: state.logo_name().to_string(),
            },
            None => LogoBadge::Monogram {
                initials: monogram(&form.sender),
            },
        };

        Self {
            sender: form.sender.clone(),
            client: form.client.clone(),
            service: form.service.clone(),
            notes: form.notes.clone(),
            currency: form.currency,
            invoice_no: or_placeholder(&form.invoice_no, "TBD"),
            issue_date: or_placeholder(&form.issue_date, "Not set"),
            due_date: or_placeholder(&form.due_date, "Flexible"),
            total: price.clone(),
            price,
            badge,
        }
    }
}

/// First two characters of the sender, uppercased.
pub fn monogram(sender: &str) -> String {
    sender.chars().take(2).collect::<String>().to_uppercase()
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Plain-text invoice for the terminal.
pub fn render_text(preview: &Preview) -> Result<String, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template("preview.tera", TEXT_TEMPLATE)?;
    let context = Context::from_serialize(preview)?;
    tera.render("preview.tera", &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::{LogoFile, LogoSource};
    use crate::model::{Field, InvoiceForm};
    use chrono::NaiveDate;

    fn state() -> FormState<()> {
        FormState::new(InvoiceForm::sample(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
    }

    fn upload(state: &mut FormState<()>, name: &str, media_type: &str) {
        let file = LogoFile {
            name: name.into(),
            media_type: media_type.into(),
            source: LogoSource::Bytes(Vec::new().into()),
        };
        state.upload_logo(&file, |_| Ok(()));
    }

    #[test]
    fn sample_preview() {
        let preview = Preview::render(&state());
        assert_eq!(preview.price, "$1,200.00");
        assert_eq!(preview.total, "$1,200.00");
        assert_eq!(preview.invoice_no, "INV-2025-001");
        assert_eq!(preview.issue_date, "2025-06-01");
        assert_eq!(preview.due_date, "Flexible");
        assert_eq!(preview.badge, LogoBadge::Monogram { initials: "BR".into() });
    }

    #[test]
    fn empty_fields_fall_back_to_placeholders() {
        let mut state = state();
        state.update(Field::InvoiceNo, String::new());
        state.update(Field::IssueDate, String::new());
        state.update(Field::DueDate, String::new());
        let preview = Preview::render(&state);
        assert_eq!(preview.invoice_no, "TBD");
        assert_eq!(preview.issue_date, "Not set");
        assert_eq!(preview.due_date, "Flexible");
    }

    #[test]
    fn filled_fields_render_verbatim() {
        let mut state = state();
        state.update(Field::InvoiceNo, "A-17".into());
        state.update(Field::DueDate, "2025-07-01".into());
        let preview = Preview::render(&state);
        assert_eq!(preview.invoice_no, "A-17");
        assert_eq!(preview.due_date, "2025-07-01");
    }

    #[test]
    fn price_follows_currency_and_raw_text() {
        let mut state = state();
        state.set_currency(crate::model::Currency::Eur);
        assert_eq!(Preview::render(&state).price, "€1,200.00");

        state.update(Field::Price, "abc".into());
        assert_eq!(Preview::render(&state).price, "abc");

        state.update(Field::Price, String::new());
        assert_eq!(Preview::render(&state).total, "€0.00");
    }

    #[test]
    fn badge_tracks_logo_lifecycle() {
        let mut state = state();
        upload(&mut state, "brand.png", "image/png");
        assert_eq!(
            Preview::render(&state).badge,
            LogoBadge::Image { name: "brand.png".into() }
        );

        state.clear_logo();
        assert_eq!(
            Preview::render(&state).badge,
            LogoBadge::Monogram { initials: "BR".into() }
        );
    }

    #[test]
    fn monogram_handles_short_and_unicode_names() {
        assert_eq!(monogram("Bright Studio"), "BR");
        assert_eq!(monogram("x"), "X");
        assert_eq!(monogram(""), "");
        assert_eq!(monogram("élan"), "ÉL");
    }

    #[test]
    fn text_rendering_includes_preview_values() {
        let mut state = state();
        state.update(Field::Client, "Northwind & Co".into());
        let text = render_text(&Preview::render(&state)).unwrap();
        assert!(text.contains("Bright Studio"));
        assert!(text.contains("Northwind & Co"));
        assert!(text.contains("$1,200.00"));
        assert!(text.contains("Flexible"));
        assert!(text.contains("[BR]"));
        assert!(text.contains("USD"));
    }

    #[test]
    fn json_uses_tagged_badge() {
        let mut state = state();
        upload(&mut state, "brand.svg", "image/svg+xml");
        let json = serde_json::to_value(Preview::render(&state)).unwrap();
        assert_eq!(json["badge"]["kind"], "image");
        assert_eq!(json["badge"]["name"], "brand.svg");
        assert_eq!(json["currency"], "USD");
    }
}
