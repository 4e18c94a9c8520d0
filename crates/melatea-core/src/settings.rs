//! # Settings Module
//!
//! Store configuration edited on the settings page.
//!
//! ## Sections
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ general          │ storeName, storeAddress, logoUrl, timezone, language │
//! │ printer          │ enabled, type (usb | network), autoPrint             │
//! │ paymentMethods   │ cash, card, qris, transfer, qrCodeUrl, instructions  │
//! │ notifications    │ lowStockAlert, defaultReorderThreshold               │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Fields are edited one at a time with [`Settings::update`], which takes the
//! camelCase field name and a JSON value, exactly as the form sends them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::PaymentMethod;
use crate::validation::{validate_required, ValidationResult};
use crate::DEFAULT_REORDER_THRESHOLD;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GeneralSettings {
    pub store_name: String,
    pub store_address: String,
    pub logo_url: String,
    pub timezone: String,
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            store_name: "MelaTea".to_string(),
            store_address: "Jl. Raya No. 123, Jakarta".to_string(),
            logo_url: String::new(),
            timezone: "Asia/Jakarta".to_string(),
            language: "English".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PrinterType {
    #[default]
    Usb,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PrinterSettings {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub printer_type: PrinterType,
    pub auto_print: bool,
}

impl PrinterSettings {
    /// Whether a receipt is printed without asking after each payment.
    pub fn prints_automatically(&self) -> bool {
        self.enabled && self.auto_print
    }
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            enabled: true,
            printer_type: PrinterType::Usb,
            auto_print: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentMethodSettings {
    pub cash: bool,
    pub card: bool,
    pub qris: bool,
    pub transfer: bool,
    /// QR image shown to the customer for QRIS payments.
    pub qr_code_url: String,
    pub instructions: String,
}

impl PaymentMethodSettings {
    pub fn is_enabled(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Card => self.card,
            PaymentMethod::Qris => self.qris,
            PaymentMethod::Transfer => self.transfer,
        }
    }
}

impl Default for PaymentMethodSettings {
    fn default() -> Self {
        PaymentMethodSettings {
            cash: true,
            card: true,
            qris: true,
            transfer: false,
            qr_code_url: String::new(),
            instructions: "Please scan the QR code to complete payment".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NotificationSettings {
    pub low_stock_alert: bool,
    /// Threshold given to materials registered without one.
    pub default_reorder_threshold: i64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            low_stock_alert: true,
            default_reorder_threshold: DEFAULT_REORDER_THRESHOLD,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Name of a settings section, as used by the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SettingsSection {
    General,
    Printer,
    PaymentMethods,
    Notifications,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 4] = [
        SettingsSection::General,
        SettingsSection::Printer,
        SettingsSection::PaymentMethods,
        SettingsSection::Notifications,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SettingsSection::General => "general",
            SettingsSection::Printer => "printer",
            SettingsSection::PaymentMethods => "paymentMethods",
            SettingsSection::Notifications => "notifications",
        }
    }
}

impl fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingsSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "settings section".to_string(),
                allowed: SettingsSection::ALL
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            })
    }
}

/// All store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    pub general: GeneralSettings,
    pub printer: PrinterSettings,
    pub payment_methods: PaymentMethodSettings,
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Replaces one field of one section.
    ///
    /// Other fields and sections are left untouched. On error nothing changes.
    ///
    /// ## Errors
    /// - `ValidationError::NotAllowed` if the section has no such field
    /// - `ValidationError::InvalidFormat` if the value has the wrong type
    ///
    /// ## Example
    /// ```rust
    /// use melatea_core::settings::{Settings, SettingsSection};
    /// use serde_json::json;
    ///
    /// let mut settings = Settings::default();
    /// settings
    ///     .update(SettingsSection::PaymentMethods, "transfer", json!(true))
    ///     .unwrap();
    /// assert!(settings.payment_methods.transfer);
    ///
    /// assert!(settings.update(SettingsSection::Printer, "autoPrint", json!("yes")).is_err());
    /// ```
    pub fn update(
        &mut self,
        section: SettingsSection,
        field: &str,
        value: Value,
    ) -> ValidationResult<()> {
        match section {
            SettingsSection::General => {
                self.general = merge_field(&self.general, field, value)?;
            }
            SettingsSection::Printer => {
                self.printer = merge_field(&self.printer, field, value)?;
            }
            SettingsSection::PaymentMethods => {
                self.payment_methods = merge_field(&self.payment_methods, field, value)?;
            }
            SettingsSection::Notifications => {
                self.notifications = merge_field(&self.notifications, field, value)?;
            }
        }
        Ok(())
    }

    /// Checks the settings before they are saved.
    ///
    /// ## Rules
    /// - Store name is required
    /// - Default reorder threshold is not negative
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("store name", &self.general.store_name)?;

        if self.notifications.default_reorder_threshold < 0 {
            return Err(ValidationError::OutOfRange {
                field: "default reorder threshold".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        Ok(())
    }
}

/// Round-trips a section through JSON with one field replaced.
fn merge_field<T>(current: &T, field: &str, value: Value) -> ValidationResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |reason: String| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason,
    };

    let mut object = match serde_json::to_value(current).map_err(|e| invalid(e.to_string()))? {
        Value::Object(map) => map,
        _ => return Err(invalid("section is not an object".to_string())),
    };

    if !object.contains_key(field) {
        return Err(ValidationError::NotAllowed {
            field: "settings field".to_string(),
            allowed: object.keys().cloned().collect(),
        });
    }

    object.insert(field.to_string(), value);
    serde_json::from_value(Value::Object(object)).map_err(|e| invalid(e.to_string()))
}

// =============================================================================
// Settings Store
// =============================================================================

/// Settings plus an unsaved-changes flag.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    settings: Settings,
    dirty: bool,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        SettingsStore {
            settings,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True when there are edits that have not been saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies a field edit and marks the store dirty.
    pub fn update(
        &mut self,
        section: SettingsSection,
        field: &str,
        value: Value,
    ) -> ValidationResult<()> {
        self.settings.update(section, field, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Clears the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.store_name, "MelaTea");
        assert_eq!(settings.general.store_address, "Jl. Raya No. 123, Jakarta");
        assert_eq!(settings.general.timezone, "Asia/Jakarta");
        assert!(settings.printer.prints_automatically());
        assert!(!settings.payment_methods.transfer);
        assert_eq!(settings.notifications.default_reorder_threshold, 10);
    }

    #[test]
    fn test_serializes_with_form_field_names() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["general"]["storeName"], "MelaTea");
        assert_eq!(value["printer"]["type"], "usb");
        assert_eq!(value["paymentMethods"]["qrCodeUrl"], "");
        assert_eq!(value["notifications"]["lowStockAlert"], true);
    }

    #[test]
    fn test_update_replaces_one_field() {
        let mut settings = Settings::default();
        settings
            .update(SettingsSection::General, "storeName", json!("MelaTea Bandung"))
            .unwrap();
        settings
            .update(SettingsSection::Printer, "type", json!("network"))
            .unwrap();

        assert_eq!(settings.general.store_name, "MelaTea Bandung");
        assert_eq!(settings.general.language, "English");
        assert_eq!(settings.printer.printer_type, PrinterType::Network);
    }

    #[test]
    fn test_update_rejects_unknown_field() {
        let mut settings = Settings::default();
        let err = settings
            .update(SettingsSection::General, "currency", json!("IDR"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_update_rejects_wrong_type() {
        let mut settings = Settings::default();
        let err = settings
            .update(
                SettingsSection::Notifications,
                "defaultReorderThreshold",
                json!("ten"),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        assert_eq!(settings.notifications.default_reorder_threshold, 10);
    }

    #[test]
    fn test_section_parse() {
        assert_eq!(
            "paymentMethods".parse::<SettingsSection>().unwrap(),
            SettingsSection::PaymentMethods
        );
        assert!("payment".parse::<SettingsSection>().is_err());
    }

    #[test]
    fn test_validate_requires_store_name() {
        let mut settings = Settings::default();
        settings
            .update(SettingsSection::General, "storeName", json!("  "))
            .unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_store_dirty_flag() {
        let mut store = SettingsStore::default();
        assert!(!store.is_dirty());

        assert!(store
            .update(SettingsSection::Printer, "nope", json!(true))
            .is_err());
        assert!(!store.is_dirty());

        store
            .update(SettingsSection::Printer, "autoPrint", json!(false))
            .unwrap();
        assert!(store.is_dirty());
        assert!(!store.settings().printer.prints_automatically());

        store.mark_saved();
        assert!(!store.is_dirty());
    }
}
