use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use petshop_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ExpectedVersion};
use petshop_events::{Event, EventEnvelope};

use crate::category::Category;

/// Aggregate root: InventoryLedger.
///
/// Tracks an integer quantity per category for one shop. A category that was
/// never added reads as zero; once added, a category stays in the ledger even
/// when its quantity drops back to zero.
///
/// Mutations are applied as [`InventoryEvent`]s. A ledger built with
/// [`InventoryLedger::journaled`] also keeps those events until
/// [`InventoryLedger::take_journal`] drains them; a plain ledger keeps only
/// the counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLedger {
    label: String,
    counts: BTreeMap<Category, i64>,
    version: u64,
    journal: Option<Vec<InventoryEvent>>,
}

impl InventoryLedger {
    /// Create an empty ledger. The label is not validated.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            counts: BTreeMap::new(),
            version: 0,
            journal: None,
        }
    }

    /// Create an empty ledger that records every applied event.
    pub fn journaled(label: impl Into<String>) -> Self {
        Self {
            journal: Some(Vec::new()),
            ..Self::new(label)
        }
    }

    /// Rebuild a journaled ledger by applying `events` in order.
    ///
    /// Replayed events are not journaled; only later mutations are.
    pub fn rehydrate(
        label: impl Into<String>,
        events: impl IntoIterator<Item = InventoryEvent>,
    ) -> Self {
        let mut ledger = Self::journaled(label);
        for event in events {
            ledger.apply(&event);
        }
        ledger
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Add `quantity` units of `category`, creating the entry if needed.
    ///
    /// No guard on the sign of `quantity`: a negative value decrements the
    /// entry. Use [`InventoryLedger::execute`] with [`AddStock`] for the
    /// validated path.
    pub fn add(&mut self, category: impl Into<Category>, quantity: i64) {
        self.record(InventoryEvent::StockAdded(StockAdded {
            category: category.into(),
            quantity,
            occurred_at: Utc::now(),
        }));
    }

    /// Remove `quantity` units of `category` if enough are in stock.
    ///
    /// Returns `false` and leaves the ledger untouched when the category is
    /// unknown, holds less than `quantity`, or the difference is not
    /// representable (a huge negative `quantity`).
    pub fn remove(&mut self, category: &str, quantity: i64) -> bool {
        let available = self.counts.get(category).copied();
        match available {
            Some(stock) if stock >= quantity && stock.checked_sub(quantity).is_some() => {
                self.record(InventoryEvent::StockRemoved(StockRemoved {
                    category: Category::from(category),
                    quantity,
                    occurred_at: Utc::now(),
                }));
                true
            }
            _ => {
                debug!(
                    ledger = %self.label,
                    category,
                    quantity,
                    available = available.unwrap_or(0),
                    "removal refused"
                );
                false
            }
        }
    }

    /// Current quantity of `category`, or zero if it was never added.
    pub fn count(&self, category: &str) -> i64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Whether `category` has ever been added to this ledger.
    pub fn contains(&self, category: &str) -> bool {
        self.counts.contains_key(category)
    }

    /// All known categories with their quantities, in category order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.counts.iter().map(|(c, q)| (c.as_str(), *q))
    }

    pub fn is_journaled(&self) -> bool {
        self.journal.is_some()
    }

    /// Events applied since construction (or since the last `take_journal`).
    ///
    /// Always empty for a plain ledger.
    pub fn journal(&self) -> &[InventoryEvent] {
        self.journal.as_deref().unwrap_or(&[])
    }

    /// Drain the journal, e.g. after handing the events to a store.
    pub fn take_journal(&mut self) -> Vec<InventoryEvent> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Journal wrapped in envelopes on the stream named after the ledger.
    ///
    /// Sequence numbers continue from the version the ledger had before the
    /// journaled events were applied.
    pub fn envelopes(&self) -> Vec<EventEnvelope<InventoryEvent>> {
        let journal = self.journal();
        let base = self.version - journal.len() as u64;
        journal
            .iter()
            .enumerate()
            .map(|(i, e)| EventEnvelope::wrap(self.label.clone(), base + i as u64 + 1, e.clone()))
            .collect()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            label: self.label.clone(),
            version: self.version,
            counts: self
                .counts
                .iter()
                .map(|(c, q)| (c.as_str().to_string(), *q))
                .collect(),
        }
    }

    /// Validate `command`, then apply and journal the resulting events.
    pub fn execute(&mut self, command: &InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = self.handle(command)?;
        for event in &events {
            self.record(event.clone());
        }
        Ok(events)
    }

    /// Like [`InventoryLedger::execute`], guarded by an optimistic version check.
    pub fn execute_expecting(
        &mut self,
        expected: ExpectedVersion,
        command: &InventoryCommand,
    ) -> DomainResult<Vec<InventoryEvent>> {
        expected.check(self.version)?;
        self.execute(command)
    }

    fn record(&mut self, event: InventoryEvent) {
        self.apply(&event);
        debug!(
            ledger = %self.label,
            event_type = %event.qualified_type(),
            version = self.version,
            "inventory event applied"
        );
        if let Some(journal) = self.journal.as_mut() {
            journal.push(event);
        }
    }
}

impl AggregateRoot for InventoryLedger {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.label
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Serializable read model of a ledger's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub label: String,
    pub version: u64,
    pub counts: BTreeMap<String, i64>,
}

/// Command: AddStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub category: Category,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveStock {
    pub category: Category,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddStock(AddStock),
    RemoveStock(RemoveStock),
}

/// Event: StockAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub category: Category,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRemoved {
    pub category: Category,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockAdded(StockAdded),
    StockRemoved(StockRemoved),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockAdded(_) => "inventory.stock.added",
            InventoryEvent::StockRemoved(_) => "inventory.stock.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockAdded(e) => e.occurred_at,
            InventoryEvent::StockRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for InventoryLedger {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::StockAdded(e) => {
                let stock = self.counts.entry(e.category.clone()).or_insert(0);
                *stock = stock.saturating_add(e.quantity);
            }
            InventoryEvent::StockRemoved(e) => {
                let stock = self.counts.entry(e.category.clone()).or_insert(0);
                *stock = stock.saturating_sub(e.quantity);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddStock(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveStock(cmd) => self.handle_remove(cmd),
        }
    }
}

impl InventoryLedger {
    fn ensure_category(category: &Category) -> DomainResult<()> {
        if category.is_blank() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        Ok(())
    }

    fn ensure_positive(quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddStock) -> DomainResult<Vec<InventoryEvent>> {
        Self::ensure_category(&cmd.category)?;
        Self::ensure_positive(cmd.quantity)?;

        if self.count(cmd.category.as_str()).checked_add(cmd.quantity).is_none() {
            return Err(DomainError::invariant(format!(
                "stock overflow for {}",
                cmd.category
            )));
        }

        Ok(vec![InventoryEvent::StockAdded(StockAdded {
            category: cmd.category.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveStock) -> DomainResult<Vec<InventoryEvent>> {
        Self::ensure_category(&cmd.category)?;
        Self::ensure_positive(cmd.quantity)?;

        let available = self.count(cmd.category.as_str());
        if !self.contains(cmd.category.as_str()) || available < cmd.quantity {
            return Err(DomainError::invariant(format!(
                "insufficient stock for {} (requested: {}, available: {available})",
                cmd.category, cmd.quantity
            )));
        }

        Ok(vec![InventoryEvent::StockRemoved(StockRemoved {
            category: cmd.category.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}
