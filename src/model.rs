use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::UnknownCurrency;

/// Storage format of the issue and due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// Selectable options, in display order.
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// The free-text fields of the invoice record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sender,
    Client,
    Service,
    Price,
    InvoiceNo,
    IssueDate,
    DueDate,
    Notes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub sender: String,
    pub client: String,
    pub service: String,
    pub price: String,        // raw text, formatted only for display
    pub invoice_no: String,
    pub issue_date: String,   // YYYY-MM-DD
    pub due_date: String,     // YYYY-MM-DD, empty = flexible
    pub notes: String,
    pub currency: Currency,
}

impl InvoiceForm {
    /// Sample invoice every session starts from.
    pub fn sample(today: NaiveDate) -> Self {
        Self {
            sender: "Bright Studio".into(),
            client: "Client Name".into(),
            service: "Product design sprint and prototype".into(),
            price: "1200".into(),
            invoice_no: "INV-2025-001".into(),
            issue_date: today.format(DATE_FORMAT).to_string(),
            due_date: String::new(),
            notes: "Payment is due within 14 days. Thank you for your trust.".into(),
            currency: Currency::Usd,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Sender => &self.sender,
            Field::Client => &self.client,
            Field::Service => &self.service,
            Field::Price => &self.price,
            Field::InvoiceNo => &self.invoice_no,
            Field::IssueDate => &self.issue_date,
            Field::DueDate => &self.due_date,
            Field::Notes => &self.notes,
        }
    }

    /// The field read as a date; `None` when empty or not a `YYYY-MM-DD` date.
    pub fn date(&self, field: Field) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.get(field), DATE_FORMAT).ok()
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Sender => &mut self.sender,
            Field::Client => &mut self.client,
            Field::Service => &mut self.service,
            Field::Price => &mut self.price,
            Field::InvoiceNo => &mut self.invoice_no,
            Field::IssueDate => &mut self.issue_date,
            Field::DueDate => &mut self.due_date,
            Field::Notes => &mut self.notes,
        };
        *slot = value;
    }
}
