//! # Inventory Module
//!
//! Raw materials, stock movements and the stock ledger.
//!
//! ## Ledger Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stock Ledger                                    │
//! │                                                                         │
//! │  receive(Black Tea, +50) ──┐                                            │
//! │  consume(Black Tea,  -5) ──┼──► movements (append-only, immutable)      │
//! │  receive(Honey,     +10) ──┘          │                                 │
//! │                                       ▼                                 │
//! │                          Material.current_stock += quantity            │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │              status() = f(current_stock, reorder_threshold)            │
//! │              (computed on every read, never stored)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Rules
//! | Stock                    | Status         |
//! |--------------------------|----------------|
//! | stock ≤ 0                | out-of-stock   |
//! | 0 < stock ≤ threshold    | low-stock      |
//! | stock > threshold        | sufficient     |

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_name, validate_stock_quantity, validate_threshold};
use crate::{DEFAULT_REORDER_THRESHOLD, SYSTEM_EMPLOYEE};

/// Note recorded on receipts of stock when the form leaves it blank.
pub const DEFAULT_RECEIVE_NOTE: &str = "Stock received";

/// Note recorded on consumption when none is given.
pub const DEFAULT_CONSUME_NOTE: &str = "Order production";

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock level of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    Sufficient,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Computes the status from a stock level and reorder threshold.
    ///
    /// This is the only place a status is ever produced.
    ///
    /// ## Example
    /// ```rust
    /// use melatea_core::inventory::StockStatus;
    /// use rust_decimal::Decimal;
    ///
    /// let status = StockStatus::from_levels(Decimal::from(8), Decimal::from(30));
    /// assert_eq!(status, StockStatus::LowStock);
    /// ```
    pub fn from_levels(current_stock: Decimal, reorder_threshold: Decimal) -> Self {
        if current_stock <= Decimal::ZERO {
            StockStatus::OutOfStock
        } else if current_stock <= reorder_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::Sufficient
        }
    }

    /// Label shown in the inventory table.
    pub const fn label(&self) -> &'static str {
        match self {
            StockStatus::Sufficient => "Sufficient",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

// =============================================================================
// Material
// =============================================================================

/// A raw-good inventory unit (tea leaves, sugar, syrup).
///
/// `current_stock` has no public setter: it only changes when the ledger
/// applies a movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    id: String,
    name: String,
    unit: String,
    current_stock: Decimal,
    reorder_threshold: Decimal,
    last_updated: DateTime<Utc>,
    unit_cost: Option<Money>,
    supplier: Option<String>,
}

impl Material {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn current_stock(&self) -> Decimal {
        self.current_stock
    }

    pub fn reorder_threshold(&self) -> Decimal {
        self.reorder_threshold
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn unit_cost(&self) -> Option<Money> {
        self.unit_cost
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    /// Current status, recomputed from stock and threshold.
    pub fn status(&self) -> StockStatus {
        StockStatus::from_levels(self.current_stock, self.reorder_threshold)
    }

    /// Serializable view with the derived status attached.
    pub fn snapshot(&self) -> MaterialSnapshot {
        MaterialSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            unit: self.unit.clone(),
            current_stock: self.current_stock,
            reorder_threshold: self.reorder_threshold,
            status: self.status(),
            last_updated: self.last_updated,
            unit_cost: self.unit_cost,
            supplier: self.supplier.clone(),
        }
    }

    fn apply(&mut self, quantity: Decimal, at: DateTime<Utc>) {
        self.current_stock += quantity;
        self.last_updated = at;
    }
}

/// Read view of a material for the inventory table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MaterialSnapshot {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[ts(as = "String")]
    pub current_stock: Decimal,
    #[ts(as = "String")]
    pub reorder_threshold: Decimal,
    pub status: StockStatus,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    pub unit_cost: Option<Money>,
    pub supplier: Option<String>,
}

/// Registration data for a new material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterial {
    pub id: String,
    pub name: String,
    pub unit: String,
    /// Opening balance. Not recorded as a movement.
    pub opening_stock: Decimal,
    /// `None` falls back to the default threshold passed at registration.
    pub reorder_threshold: Option<Decimal>,
    pub unit_cost: Option<Money>,
    pub supplier: Option<String>,
    pub as_of: DateTime<Utc>,
}

impl NewMaterial {
    /// A material with zero opening stock and no threshold.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit: impl Into<String>) -> Self {
        NewMaterial {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            opening_stock: Decimal::ZERO,
            reorder_threshold: None,
            unit_cost: None,
            supplier: None,
            as_of: Utc::now(),
        }
    }

    pub fn opening_stock(mut self, stock: Decimal) -> Self {
        self.opening_stock = stock;
        self
    }

    pub fn threshold(mut self, threshold: Decimal) -> Self {
        self.reorder_threshold = Some(threshold);
        self
    }

    pub fn cost(mut self, unit_cost: Money) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn as_of(mut self, at: DateTime<Utc>) -> Self {
        self.as_of = at;
        self
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Received,
    Consumed,
}

impl MovementKind {
    pub const fn label(&self) -> &'static str {
        match self {
            MovementKind::Received => "Received",
            MovementKind::Consumed => "Consumed",
        }
    }
}

/// A single recorded change to a material's stock.
///
/// Material name and unit are frozen at the time of the movement so the
/// history reads the same even if the material is renamed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    /// Position in the ledger; breaks timestamp ties.
    pub sequence: u64,
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    pub kind: MovementKind,
    /// Signed quantity: positive for receive, negative for consume.
    #[ts(as = "String")]
    pub quantity: Decimal,
    /// Stock of the material right after this movement.
    #[ts(as = "String")]
    pub resulting_stock: Decimal,
    #[ts(as = "String")]
    pub at: DateTime<Utc>,
    pub note: String,
    /// Purchase order for receipts, order id for consumption.
    pub reference: String,
    pub employee: String,
}

/// Input for [`StockLedger::receive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveStock {
    pub material_id: String,
    pub quantity: Decimal,
    pub note: Option<String>,
    /// `None` generates `RCV-<unix millis>`.
    pub reference: Option<String>,
    pub employee: String,
}

/// Input for [`StockLedger::consume_with`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeStock {
    pub material_id: String,
    pub quantity: Decimal,
    pub reference: String,
    pub note: Option<String>,
    pub employee: Option<String>,
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// What the ledger does when consumption exceeds stock on hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPolicy {
    /// Allow stock to go below zero (back-orders).
    pub allow_negative_stock: bool,
}

/// Counts of materials per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockSummary {
    pub total: usize,
    pub sufficient: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl StockSummary {
    /// Tallies the statuses of the given snapshots.
    pub fn of(materials: &[MaterialSnapshot]) -> Self {
        materials.iter().fold(
            StockSummary {
                total: materials.len(),
                ..StockSummary::default()
            },
            |mut acc, m| {
                match m.status {
                    StockStatus::Sufficient => acc.sufficient += 1,
                    StockStatus::LowStock => acc.low_stock += 1,
                    StockStatus::OutOfStock => acc.out_of_stock += 1,
                }
                acc
            },
        )
    }
}

/// Append-only list of movements plus the materials they apply to.
///
/// ## Invariants
/// - A material's stock equals its opening balance plus the sum of its
///   movement quantities
/// - Movements are never edited or removed
/// - With the default policy, stock never goes below zero
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    materials: Vec<Material>,
    movements: Vec<StockMovement>,
    next_sequence: u64,
    policy: LedgerPolicy,
}

impl StockLedger {
    /// Creates an empty ledger with the default (no negative stock) policy.
    pub fn new() -> Self {
        StockLedger::default()
    }

    /// Creates an empty ledger with the given policy.
    pub fn with_policy(policy: LedgerPolicy) -> Self {
        StockLedger {
            policy,
            ..StockLedger::default()
        }
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Registers a material, falling back to [`DEFAULT_REORDER_THRESHOLD`]
    /// when it carries no threshold.
    pub fn register(&mut self, new: NewMaterial) -> CoreResult<&Material> {
        self.register_with_default_threshold(new, Decimal::from(DEFAULT_REORDER_THRESHOLD))
    }

    /// Registers a material.
    ///
    /// `default_threshold` is used when the registration carries none
    /// (the settings' default reorder threshold).
    ///
    /// ## Errors
    /// - `ValidationError::Duplicate` if the id is already registered
    /// - `ValidationError::OutOfRange` for a negative opening stock, unless
    ///   the policy allows negative stock
    pub fn register_with_default_threshold(
        &mut self,
        new: NewMaterial,
        default_threshold: Decimal,
    ) -> CoreResult<&Material> {
        let id = validate_name("material id", &new.id)?;
        let name = validate_name("material name", &new.name)?;
        let unit = validate_name("unit", &new.unit)?;
        let threshold = new.reorder_threshold.unwrap_or(default_threshold);
        validate_threshold(threshold)?;

        if new.opening_stock < Decimal::ZERO && !self.policy.allow_negative_stock {
            return Err(ValidationError::OutOfRange {
                field: "opening stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        if self.materials.iter().any(|m| m.id == id) {
            return Err(ValidationError::Duplicate {
                field: "material id".to_string(),
                value: id,
            }
            .into());
        }

        self.materials.push(Material {
            id,
            name,
            unit,
            current_stock: new.opening_stock,
            reorder_threshold: threshold,
            last_updated: new.as_of,
            unit_cost: new.unit_cost,
            supplier: new.supplier,
        });

        let idx = self.materials.len() - 1;
        Ok(&self.materials[idx])
    }

    /// Looks up a material by id.
    pub fn material(&self, material_id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == material_id)
    }

    /// All materials in registration order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Status of a material. Pure.
    pub fn status_of(&self, material: &Material) -> StockStatus {
        material.status()
    }

    /// Changes a material's reorder threshold.
    pub fn set_threshold(&mut self, material_id: &str, threshold: Decimal) -> CoreResult<()> {
        validate_threshold(threshold)?;
        let material = self.material_mut(material_id)?;
        material.reorder_threshold = threshold;
        Ok(())
    }

    /// Receives stock now. See [`StockLedger::receive_at`].
    pub fn receive(&mut self, request: ReceiveStock) -> CoreResult<StockMovement> {
        self.receive_at(request, Utc::now())
    }

    /// Appends a receive movement and increases the material's stock.
    ///
    /// ## Errors
    /// - `ValidationError::MustBePositive` if quantity ≤ 0
    /// - `CoreError::MaterialNotFound` if the material is unknown
    pub fn receive_at(
        &mut self,
        request: ReceiveStock,
        at: DateTime<Utc>,
    ) -> CoreResult<StockMovement> {
        validate_stock_quantity(request.quantity)?;

        let note = request
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_RECEIVE_NOTE.to_string());
        let reference = request
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| format!("RCV-{}", at.timestamp_millis()));

        self.append(
            &request.material_id,
            MovementKind::Received,
            request.quantity,
            at,
            note,
            reference,
            request.employee,
        )
    }

    /// Consumes stock now for an order.
    pub fn consume(
        &mut self,
        material_id: &str,
        quantity: Decimal,
        reference: &str,
    ) -> CoreResult<StockMovement> {
        self.consume_at(material_id, quantity, reference, Utc::now())
    }

    /// Consumes stock at a given time with the default note and employee.
    pub fn consume_at(
        &mut self,
        material_id: &str,
        quantity: Decimal,
        reference: &str,
        at: DateTime<Utc>,
    ) -> CoreResult<StockMovement> {
        self.consume_with(
            ConsumeStock {
                material_id: material_id.to_string(),
                quantity,
                reference: reference.to_string(),
                note: None,
                employee: None,
            },
            at,
        )
    }

    /// Appends a consume movement (stored as a negative quantity).
    ///
    /// ## Errors
    /// - `ValidationError::MustBePositive` if quantity ≤ 0
    /// - `CoreError::MaterialNotFound` if the material is unknown
    /// - `CoreError::InsufficientStock` if the quantity exceeds stock and the
    ///   policy forbids negative stock
    pub fn consume_with(
        &mut self,
        request: ConsumeStock,
        at: DateTime<Utc>,
    ) -> CoreResult<StockMovement> {
        validate_stock_quantity(request.quantity)?;

        let material = self
            .material(&request.material_id)
            .ok_or_else(|| CoreError::MaterialNotFound(request.material_id.clone()))?;

        if !self.policy.allow_negative_stock && request.quantity > material.current_stock {
            return Err(CoreError::InsufficientStock {
                material: material.name.clone(),
                available: material.current_stock.normalize().to_string(),
                requested: request.quantity.normalize().to_string(),
            });
        }

        let note = request
            .note
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONSUME_NOTE.to_string());
        let employee = request
            .employee
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| SYSTEM_EMPLOYEE.to_string());

        self.append(
            &request.material_id,
            MovementKind::Consumed,
            -request.quantity,
            at,
            note,
            request.reference,
            employee,
        )
    }

    /// Movements of one material, newest first.
    ///
    /// Ties on timestamp are broken by ledger position, later first.
    pub fn history_of(&self, material_id: &str) -> Vec<StockMovement> {
        let mut history: Vec<StockMovement> = self
            .movements
            .iter()
            .filter(|m| m.material_id == material_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.at.cmp(&a.at).then(b.sequence.cmp(&a.sequence)));
        history
    }

    /// Every movement in append order.
    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    /// All materials with their derived status.
    pub fn snapshot(&self) -> Vec<MaterialSnapshot> {
        self.materials.iter().map(Material::snapshot).collect()
    }

    /// Status counts over all materials.
    pub fn summary(&self) -> StockSummary {
        StockSummary::of(&self.snapshot())
    }

    fn material_mut(&mut self, material_id: &str) -> CoreResult<&mut Material> {
        self.materials
            .iter_mut()
            .find(|m| m.id == material_id)
            .ok_or_else(|| CoreError::MaterialNotFound(material_id.to_string()))
    }

    #[allow(clippy::too_many_arguments)]
    fn append(
        &mut self,
        material_id: &str,
        kind: MovementKind,
        quantity: Decimal,
        at: DateTime<Utc>,
        note: String,
        reference: String,
        employee: String,
    ) -> CoreResult<StockMovement> {
        let sequence = self.next_sequence;
        let material = self.material_mut(material_id)?;
        material.apply(quantity, at);

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            sequence,
            material_id: material.id.clone(),
            material_name: material.name.clone(),
            unit: material.unit.clone(),
            kind,
            quantity,
            resulting_stock: material.current_stock,
            at,
            note,
            reference,
            employee,
        };

        self.next_sequence += 1;
        self.movements.push(movement.clone());

        Ok(movement)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 28, 8, 0, 0).unwrap()
    }

    fn ledger() -> StockLedger {
        let mut ledger = StockLedger::new();
        ledger
            .register_with_default_threshold(
                NewMaterial::new("1", "Black Tea Leaves", "kg")
                    .opening_stock(dec(100))
                    .threshold(dec(50))
                    .as_of(t0()),
                dec(10),
            )
            .unwrap();
        ledger
            .register_with_default_threshold(
                NewMaterial::new("6", "Matcha Powder", "kg")
                    .opening_stock(dec(8))
                    .threshold(dec(15))
                    .as_of(t0()),
                dec(10),
            )
            .unwrap();
        ledger
    }

    fn receive(material_id: &str, qty: i64) -> ReceiveStock {
        ReceiveStock {
            material_id: material_id.to_string(),
            quantity: dec(qty),
            note: None,
            reference: Some("PO-2025-001".to_string()),
            employee: "Airlangga W.".to_string(),
        }
    }

    #[test]
    fn test_status_rules() {
        assert_eq!(
            StockStatus::from_levels(dec(8), dec(30)),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::from_levels(dec(0), dec(30)),
            StockStatus::OutOfStock
        );
        assert_eq!(
            StockStatus::from_levels(dec(0), dec(0)),
            StockStatus::OutOfStock
        );
        assert_eq!(
            StockStatus::from_levels(dec(30), dec(30)),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::from_levels(dec(31), dec(30)),
            StockStatus::Sufficient
        );
        assert_eq!(
            StockStatus::from_levels(dec(-2), dec(30)),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out-of-stock\"");
    }

    #[test]
    fn test_register_uses_default_threshold() {
        let mut ledger = StockLedger::new();
        let material = ledger
            .register_with_default_threshold(NewMaterial::new("4", "Sugar", "kg"), dec(10))
            .unwrap();
        assert_eq!(material.reorder_threshold(), dec(10));
        assert_eq!(material.status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_register_falls_back_to_crate_default() {
        let mut ledger = StockLedger::new();
        let material = ledger
            .register(NewMaterial::new("5", "Honey", "kg").opening_stock(dec(15)))
            .unwrap();
        assert_eq!(material.reorder_threshold(), dec(DEFAULT_REORDER_THRESHOLD));
        assert_eq!(material.status(), StockStatus::Sufficient);
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut ledger = ledger();
        let err = ledger
            .register_with_default_threshold(NewMaterial::new("1", "Another", "kg"), dec(10))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_register_rejects_negative_opening_stock() {
        let mut ledger = ledger();
        let err = ledger
            .register(NewMaterial::new("99", "Boba", "kg").opening_stock(dec(-5)))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { min: 0, .. })
        ));
        assert!(ledger.material("99").is_none());
        assert_eq!(ledger.materials().len(), 2);
    }

    #[test]
    fn test_register_negative_opening_stock_allowed_by_policy() {
        let mut ledger = StockLedger::with_policy(LedgerPolicy {
            allow_negative_stock: true,
        });
        let material = ledger
            .register(NewMaterial::new("99", "Boba", "kg").opening_stock(dec(-5)))
            .unwrap();
        assert_eq!(material.current_stock(), dec(-5));
        assert_eq!(material.status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_receive_increases_stock_and_updates_timestamp() {
        let mut ledger = ledger();
        let at = t0() + Duration::hours(6);

        let movement = ledger.receive_at(receive("1", 50), at).unwrap();

        assert_eq!(movement.kind, MovementKind::Received);
        assert_eq!(movement.quantity, dec(50));
        assert_eq!(movement.resulting_stock, dec(150));
        assert_eq!(movement.note, DEFAULT_RECEIVE_NOTE);

        let material = ledger.material("1").unwrap();
        assert_eq!(material.current_stock(), dec(150));
        assert_eq!(material.last_updated(), at);
        assert_eq!(material.status(), StockStatus::Sufficient);
    }

    #[test]
    fn test_receive_generates_reference_when_missing() {
        let mut ledger = ledger();
        let mut request = receive("1", 5);
        request.reference = None;

        let movement = ledger.receive_at(request, t0()).unwrap();
        assert_eq!(movement.reference, format!("RCV-{}", t0().timestamp_millis()));
    }

    #[test]
    fn test_receive_rejects_non_positive_quantity() {
        let mut ledger = ledger();

        for qty in [0, -5] {
            let err = ledger.receive_at(receive("1", qty), t0()).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn test_receive_rejects_unknown_material() {
        let mut ledger = ledger();
        let err = ledger.receive_at(receive("99", 5), t0()).unwrap_err();
        assert!(matches!(err, CoreError::MaterialNotFound(id) if id == "99"));
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn test_consume_stores_negative_quantity() {
        let mut ledger = ledger();
        let movement = ledger.consume_at("1", dec(5), "ORD-001", t0()).unwrap();

        assert_eq!(movement.kind, MovementKind::Consumed);
        assert_eq!(movement.quantity, dec(-5));
        assert_eq!(movement.resulting_stock, dec(95));
        assert_eq!(movement.note, DEFAULT_CONSUME_NOTE);
        assert_eq!(movement.employee, SYSTEM_EMPLOYEE);
        assert_eq!(ledger.material("1").unwrap().current_stock(), dec(95));
    }

    #[test]
    fn test_receive_then_consume_round_trip() {
        let mut ledger = ledger();
        let before = ledger.material("6").unwrap().current_stock();

        ledger.receive_at(receive("6", 12), t0()).unwrap();
        ledger
            .consume_at("6", dec(12), "ORD-002", t0() + Duration::minutes(1))
            .unwrap();

        assert_eq!(ledger.material("6").unwrap().current_stock(), before);
    }

    #[test]
    fn test_fractional_quantities() {
        let mut ledger = ledger();
        let mut request = receive("6", 0);
        request.quantity = Decimal::new(25, 1); // 2.5 kg

        ledger.receive_at(request, t0()).unwrap();
        assert_eq!(
            ledger.material("6").unwrap().current_stock(),
            Decimal::new(105, 1)
        );
    }

    #[test]
    fn test_consume_beyond_stock_rejected_by_default() {
        let mut ledger = ledger();
        let err = ledger.consume_at("6", dec(10), "ORD-003", t0()).unwrap_err();

        match err {
            CoreError::InsufficientStock {
                material,
                available,
                requested,
            } => {
                assert_eq!(material, "Matcha Powder");
                assert_eq!(available, "8");
                assert_eq!(requested, "10");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ledger.material("6").unwrap().current_stock(), dec(8));
    }

    #[test]
    fn test_consume_exact_stock_goes_out_of_stock() {
        let mut ledger = ledger();
        ledger.consume_at("6", dec(8), "ORD-004", t0()).unwrap();

        let material = ledger.material("6").unwrap();
        assert_eq!(material.current_stock(), Decimal::ZERO);
        assert_eq!(ledger.status_of(material), StockStatus::OutOfStock);
    }

    #[test]
    fn test_negative_stock_allowed_by_policy() {
        let mut ledger = StockLedger::with_policy(LedgerPolicy {
            allow_negative_stock: true,
        });
        ledger
            .register_with_default_threshold(
                NewMaterial::new("8", "Peach Syrup", "L").threshold(dec(10)),
                dec(10),
            )
            .unwrap();

        let movement = ledger.consume_at("8", dec(3), "ORD-005", t0()).unwrap();
        assert_eq!(movement.resulting_stock, dec(-3));
        assert_eq!(
            ledger.material("8").unwrap().status(),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn test_history_newest_first() {
        let mut ledger = ledger();
        ledger.receive_at(receive("1", 10), t0()).unwrap();
        ledger
            .consume_at("1", dec(5), "ORD-001", t0() + Duration::hours(2))
            .unwrap();
        ledger
            .receive_at(receive("1", 20), t0() + Duration::hours(1))
            .unwrap();
        ledger.receive_at(receive("6", 1), t0()).unwrap();

        let history = ledger.history_of("1");
        let quantities: Vec<Decimal> = history.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![dec(-5), dec(20), dec(10)]);

        // restartable: a second read yields the same sequence
        assert_eq!(ledger.history_of("1"), history);
        assert!(ledger.history_of("99").is_empty());
    }

    #[test]
    fn test_history_ties_break_by_append_order() {
        let mut ledger = ledger();
        let first = ledger.receive_at(receive("1", 1), t0()).unwrap();
        let second = ledger.receive_at(receive("1", 2), t0()).unwrap();

        let history = ledger.history_of("1");
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn test_set_threshold_changes_status() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.material("1").unwrap().status(),
            StockStatus::Sufficient
        );

        ledger.set_threshold("1", dec(100)).unwrap();
        assert_eq!(ledger.material("1").unwrap().status(), StockStatus::LowStock);
        assert!(ledger.set_threshold("1", dec(-1)).is_err());
    }

    #[test]
    fn test_summary_counts_statuses() {
        let mut ledger = ledger();
        ledger
            .register_with_default_threshold(NewMaterial::new("3", "Milk Powder", "kg"), dec(20))
            .unwrap();

        let summary = ledger.summary();
        assert_eq!(
            summary,
            StockSummary {
                total: 3,
                sufficient: 1,
                low_stock: 1,
                out_of_stock: 1,
            }
        );
    }
}
