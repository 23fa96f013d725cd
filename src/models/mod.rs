use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// One selectable remote record, normalized from whatever shape the backend returned.
///
/// `code` is the machine key reported to the owning form as the selection value.
/// The untouched record is kept in `raw` so forms can read extra attributes
/// (price, unit, account type) on selection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct SearchOption {
    pub id: String,
    pub code: String,
    pub label: String,

    #[serde(default)]
    pub raw: serde_json::Value,
}

impl SearchOption {
    pub fn attr(&self, key: &str) -> Option<&serde_json::Value> {
        self.raw.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<String> {
        self.attr(key).and_then(scalar_to_string)
    }

    /// Numeric attribute; numeric strings ("12500.00") are accepted as well.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        match self.attr(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Ordered key fallbacks used to map a backend record onto [`SearchOption`].
///
/// Pages historically disagreed on field names (`no` vs `customerNo` vs `id`),
/// so every canonical field is looked up through a list of candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldMap {
    pub id_keys: &'static [&'static str],
    pub code_keys: &'static [&'static str],
    pub label_keys: &'static [&'static str],
}

impl FieldMap {
    /// Returns `None` when the record has no usable code.
    pub fn normalize(&self, item: &serde_json::Value) -> Option<SearchOption> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| item.get(*k).and_then(scalar_to_string))
                .find(|s| !s.trim().is_empty())
        };

        let code = first(self.code_keys)?;
        let id = first(self.id_keys).unwrap_or_else(|| code.clone());
        let label = first(self.label_keys).unwrap_or_else(|| code.clone());

        Some(SearchOption {
            id,
            code,
            label,
            raw: item.clone(),
        })
    }
}

fn scalar_to_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum LookupKind {
    Customer,
    Item,
    LedgerAccount,
}

/// Where a lookup control searches: endpoint, optional `type` filter and field mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchSource {
    pub kind: LookupKind,
    pub endpoint: String,
    pub filter: Option<String>,
    pub fields: FieldMap,
}

impl SearchSource {
    pub fn customers() -> Self {
        Self {
            kind: LookupKind::Customer,
            endpoint: "/customers/search".to_string(),
            filter: None,
            fields: FieldMap {
                id_keys: &["id"],
                code_keys: &["customerNo", "no", "code"],
                label_keys: &["name", "label"],
            },
        }
    }

    pub fn items() -> Self {
        Self {
            kind: LookupKind::Item,
            endpoint: "/items/search".to_string(),
            filter: None,
            fields: FieldMap {
                id_keys: &["id"],
                code_keys: &["itemNo", "no", "code"],
                label_keys: &["name", "description"],
            },
        }
    }

    pub fn ledger_accounts(account_type: Option<&str>) -> Self {
        Self {
            kind: LookupKind::LedgerAccount,
            endpoint: "/accounts/search".to_string(),
            filter: account_type
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            fields: FieldMap {
                id_keys: &["id"],
                code_keys: &["accountNo", "no", "code"],
                label_keys: &["name", "label"],
            },
        }
    }
}

/// A field's current selection. Owned by the form, never by the lookup control.
///
/// An empty `value` is the canonical "nothing selected" state.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Selection {
    pub value: String,
    pub display_label: String,
    pub raw: Option<SearchOption>,
}

impl Selection {
    pub fn from_option(option: SearchOption) -> Self {
        Self {
            value: option.code.clone(),
            display_label: option.label.clone(),
            raw: Some(option),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn customer_fields_prefer_customer_no() {
        let item = json!({"id": 7, "customerNo": "C001", "no": "X", "name": "Budi Santoso"});
        let opt = SearchSource::customers()
            .fields
            .normalize(&item)
            .expect("should normalize");
        assert_eq!(opt.id, "7");
        assert_eq!(opt.code, "C001");
        assert_eq!(opt.label, "Budi Santoso");
        assert_eq!(opt.raw, item);
    }

    #[test]
    fn falls_back_through_code_keys() {
        let item = json!({"id": "a1", "no": "4-100", "name": "Office supplies"});
        let opt = SearchSource::ledger_accounts(None)
            .fields
            .normalize(&item)
            .expect("should normalize");
        assert_eq!(opt.code, "4-100");
    }

    #[test]
    fn missing_code_drops_record() {
        let item = json!({"id": 1, "name": "No code"});
        assert!(SearchSource::items().fields.normalize(&item).is_none());

        let blank = json!({"id": 1, "itemNo": "  ", "name": "Blank code"});
        assert!(SearchSource::items().fields.normalize(&blank).is_none());
    }

    #[test]
    fn missing_label_and_id_fall_back_to_code() {
        let item = json!({"itemNo": 1002});
        let opt = SearchSource::items().fields.normalize(&item).expect("should normalize");
        assert_eq!(opt.code, "1002");
        assert_eq!(opt.id, "1002");
        assert_eq!(opt.label, "1002");
    }

    #[test]
    fn attributes_are_read_from_raw() {
        let item = json!({"itemNo": "I-1", "name": "Bolt", "price": "12500.50", "unit": "pcs", "stock": 3});
        let opt = SearchSource::items().fields.normalize(&item).expect("should normalize");
        assert_eq!(opt.attr_f64("price"), Some(12500.5));
        assert_eq!(opt.attr_f64("stock"), Some(3.0));
        assert_eq!(opt.attr_str("unit").as_deref(), Some("pcs"));
        assert!(opt.attr_f64("unit").is_none());
        assert!(opt.attr("missing").is_none());
    }

    #[test]
    fn ledger_filter_ignores_blank_type() {
        assert_eq!(SearchSource::ledger_accounts(Some(" ")).filter, None);
        assert_eq!(
            SearchSource::ledger_accounts(Some("expense")).filter.as_deref(),
            Some("expense")
        );
    }

    #[test]
    fn lookup_kind_renders_kebab_case() {
        assert_eq!(LookupKind::LedgerAccount.as_ref(), "ledger-account");
        assert_eq!(LookupKind::Customer.to_string(), "customer");
    }

    #[test]
    fn selection_from_option_uses_code_and_label() {
        let opt = SearchOption {
            id: "1".to_string(),
            code: "C001".to_string(),
            label: "Budi Santoso".to_string(),
            raw: json!({}),
        };
        let sel = Selection::from_option(opt.clone());
        assert_eq!(sel.value, "C001");
        assert_eq!(sel.display_label, "Budi Santoso");
        assert_eq!(sel.raw, Some(opt));
        assert!(Selection::default().is_empty());
    }
}
