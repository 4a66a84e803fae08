use chrono::NaiveDate;
use tracing::{debug, info, trace, warn};

use crate::error::LogoError;
use crate::logo::{self, LogoFile};
use crate::model::{Currency, DATE_FORMAT, Field, InvoiceForm};

/// Single owner of everything the user has entered in this session.
///
/// `L` is the loaded logo resource. Dropping it releases it, so replacing,
/// clearing, or dropping the whole state never leaks the previous logo.
pub struct FormState<L> {
    form: InvoiceForm,
    logo: Option<L>,
    logo_name: String,
    logo_error: Option<LogoError>,
}

impl<L> FormState<L> {
    pub fn new(form: InvoiceForm) -> Self {
        Self {
            form,
            logo: None,
            logo_name: String::new(),
            logo_error: None,
        }
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    pub fn logo(&self) -> Option<&L> {
        self.logo.as_ref()
    }

    pub fn logo_name(&self) -> &str {
        &self.logo_name
    }

    pub fn logo_error(&self) -> Option<&LogoError> {
        self.logo_error.as_ref()
    }

    pub fn update(&mut self, field: Field, value: String) {
        trace!(?field, %value, "field updated");
        self.form.set(field, value);
    }

    /// Stores a picked date as `YYYY-MM-DD`, or clears the field on `None`.
    pub fn set_date(&mut self, field: Field, date: Option<NaiveDate>) {
        let value = date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        self.update(field, value);
    }

    pub fn set_currency(&mut self, currency: Currency) {
        debug!(%currency, "currency selected");
        self.form.currency = currency;
    }

    /// Validates `file` and hands it to `load` to build the logo resource.
    ///
    /// On any failure the error is recorded and the current logo is kept.
    /// On success the previous logo is released before the new one is stored.
    pub fn upload_logo<F>(&mut self, file: &LogoFile, load: F)
    where
        F: FnOnce(&LogoFile) -> Result<L, LogoError>,
    {
        match logo::ensure_image(file).and_then(|()| load(file)) {
            Ok(resource) => {
                self.release_logo();
                self.logo = Some(resource);
                self.logo_name = file.name.clone();
                self.logo_error = None;
                info!(name = %file.name, media_type = %file.media_type, "logo accepted");
            }
            Err(err) => {
                warn!(name = %file.name, media_type = %file.media_type, error = %err, "logo rejected");
                self.logo_error = Some(err);
            }
        }
    }

    pub fn clear_logo(&mut self) {
        self.release_logo();
        self.logo_name.clear();
        self.logo_error = None;
        info!("logo cleared");
    }

    pub fn dismiss_logo_error(&mut self) {
        self.logo_error = None;
    }

    fn release_logo(&mut self) {
        if let Some(previous) = self.logo.take() {
            drop(previous);
            debug!(name = %self.logo_name, "released logo");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::LogoSource;
    use std::cell::Cell;
    use std::rc::Rc;

    const FIELDS: [Field; 8] = [
        Field::Sender,
        Field::Client,
        Field::Service,
        Field::Price,
        Field::InvoiceNo,
        Field::IssueDate,
        Field::DueDate,
        Field::Notes,
    ];

    /// Stand-in logo that counts how many times it was released.
    struct Tracked {
        id: u32,
        released: Rc<Cell<u32>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn state() -> FormState<Tracked> {
        FormState::new(InvoiceForm::sample(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()))
    }

    fn file(name: &str, media_type: &str) -> LogoFile {
        LogoFile {
            name: name.into(),
            media_type: media_type.into(),
            source: LogoSource::Bytes(Vec::new().into()),
        }
    }

    fn loader(id: u32, released: &Rc<Cell<u32>>) -> impl FnOnce(&LogoFile) -> Result<Tracked, LogoError> {
        let released = released.clone();
        move |_| Ok(Tracked { id, released })
    }

    #[test]
    fn each_field_round_trips_without_touching_others() {
        for field in FIELDS {
            let mut state = state();
            let before = state.form().clone();
            state.update(field, format!("value for {field:?}\nline two"));

            assert_eq!(state.form().get(field), format!("value for {field:?}\nline two"));
            for other in FIELDS.into_iter().filter(|f| *f != field) {
                assert_eq!(state.form().get(other), before.get(other), "{other:?} changed");
            }
            assert_eq!(state.form().currency, before.currency);
        }
    }

    #[test]
    fn currency_change_leaves_text_fields_alone() {
        let mut state = state();
        let before = state.form().clone();
        state.set_currency(Currency::Gbp);
        assert_eq!(state.form().currency, Currency::Gbp);
        assert_eq!(InvoiceForm { currency: Currency::Usd, ..state.form().clone() }, before);
    }

    #[test]
    fn picked_dates_are_stored_as_iso_text() {
        let mut state = state();
        state.set_date(Field::DueDate, NaiveDate::from_ymd_opt(2025, 2, 9));
        assert_eq!(state.form().due_date, "2025-02-09");
        assert_eq!(state.form().date(Field::DueDate), NaiveDate::from_ymd_opt(2025, 2, 9));
        assert_eq!(state.form().issue_date, "2025-01-15");

        state.set_date(Field::DueDate, None);
        assert_eq!(state.form().due_date, "");
    }

    #[test]
    fn non_image_upload_sets_error_and_keeps_no_logo() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("notes.txt", "text/plain"), loader(1, &released));

        assert!(state.logo().is_none());
        assert_eq!(state.logo_name(), "");
        assert_eq!(
            state.logo_error().map(ToString::to_string).as_deref(),
            Some("Please upload an image file (PNG, JPG, SVG).")
        );
    }

    #[test]
    fn image_upload_after_error_clears_it() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("notes.txt", "text/plain"), loader(1, &released));
        state.upload_logo(&file("logo.png", "image/png"), loader(2, &released));

        assert!(state.logo_error().is_none());
        assert_eq!(state.logo().map(|l| l.id), Some(2));
        assert_eq!(state.logo_name(), "logo.png");
    }

    #[test]
    fn rejected_upload_keeps_previous_logo() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("logo.png", "image/png"), loader(1, &released));
        state.upload_logo(&file("notes.txt", "text/plain"), loader(2, &released));

        assert_eq!(state.logo().map(|l| l.id), Some(1));
        assert_eq!(state.logo_name(), "logo.png");
        assert!(state.logo_error().is_some());
        // the loader for the rejected file never ran, so nothing was built or released
        assert_eq!(released.get(), 0);
    }

    #[test]
    fn failed_load_keeps_previous_logo() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("logo.png", "image/png"), loader(1, &released));
        state.upload_logo(&file("broken.png", "image/png"), |f| {
            Err(LogoError::Decode { name: f.name.clone(), reason: "truncated".into() })
        });

        assert_eq!(state.logo().map(|l| l.id), Some(1));
        assert_eq!(released.get(), 0);
        assert!(matches!(state.logo_error(), Some(LogoError::Decode { .. })));
    }

    #[test]
    fn replacing_logo_releases_the_previous_one() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("a.png", "image/png"), loader(1, &released));
        state.upload_logo(&file("b.svg", "image/svg+xml"), loader(2, &released));

        assert_eq!(released.get(), 1);
        assert_eq!(state.logo().map(|l| l.id), Some(2));
        assert_eq!(state.logo_name(), "b.svg");
    }

    #[test]
    fn clear_releases_logo_and_resets_name_and_error() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("a.png", "image/png"), loader(1, &released));
        state.upload_logo(&file("a.txt", "text/plain"), loader(2, &released));
        state.clear_logo();

        assert_eq!(released.get(), 1);
        assert!(state.logo().is_none());
        assert_eq!(state.logo_name(), "");
        assert!(state.logo_error().is_none());
    }

    #[test]
    fn dropping_state_releases_logo() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("a.png", "image/png"), loader(1, &released));
        drop(state);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn dismissing_error_keeps_logo() {
        let released = Rc::new(Cell::new(0));
        let mut state = state();
        state.upload_logo(&file("a.png", "image/png"), loader(1, &released));
        state.upload_logo(&file("a.pdf", "application/pdf"), loader(2, &released));
        state.dismiss_logo_error();

        assert!(state.logo_error().is_none());
        assert_eq!(state.logo().map(|l| l.id), Some(1));
    }
}
