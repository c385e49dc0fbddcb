//! Case-insensitive text search over stored records, as used by the `--search` option of the
//! listing commands.

use crate::model::{JournalEntry, PurchaseRecord, SaleRecord};
use serde::Serialize;

/// Records that can be matched against a search term.
pub trait Searchable {
    /// The text fields a term is looked for in.
    fn search_fields(&self) -> Vec<&str>;
}

/// A search term. A record matches when any of its search fields contains the term, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Search {
    term: String,
    #[serde(skip)]
    folded: String,
}

impl Search {
    /// Returns `None` for a blank term, which matches everything.
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            folded: term.to_lowercase(),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches<T: Searchable>(&self, record: &T) -> bool {
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
    }

    /// Keeps the records that match `search`, or all of them when there is no search.
    pub fn retain<T: Searchable>(search: Option<&Search>, records: &mut Vec<T>) {
        if let Some(search) = search {
            records.retain(|r| search.matches(r));
        }
    }
}

/// Supplier name, tax id and folio.
impl Searchable for PurchaseRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.counterparty_name.as_str(),
            self.counterparty_tax_id.as_str(),
            self.folio.as_str(),
        ]
    }
}

/// Customer name, tax id and folio.
impl Searchable for SaleRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.counterparty_name.as_str(),
            self.counterparty_tax_id.as_str(),
            self.folio.as_str(),
        ]
    }
}

/// The gloss, plus the account description and third party of every line.
impl Searchable for JournalEntry {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.gloss.as_str()];
        for line in &self.lines {
            fields.push(&line.account_name);
            fields.extend(line.third_party_tax_id.as_deref());
            fields.extend(line.third_party_name.as_deref());
        }
        fields
    }
}
