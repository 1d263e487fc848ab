// Record manager - filterable, paginated list with confirmed mutations
//
// Every mutation is staged first and only touches the record set once
// `confirm` is called. Declining drops the staged change without side effects.
use crate::application::confirmation::{check_ticket, Acknowledgement, Confirmer, Prompt, Resolution, TicketCounter};
use crate::application::error::RecordError;
use crate::domain::record::{FieldValue, ModuleSchema, PageView, Record, RecordId};
use std::collections::BTreeMap;

/// Raw form input keyed by field name
pub type FieldInput = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
enum PendingMutation {
    Add {
        fields: BTreeMap<String, FieldValue>,
    },
    Edit {
        id: RecordId,
        set: BTreeMap<String, FieldValue>,
        clear: Vec<String>,
    },
    SetStatus {
        id: RecordId,
        to: String,
    },
    Remove {
        id: RecordId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add(FieldInput),
    Edit(RecordId, FieldInput),
    AdvanceStatus(RecordId),
    Remove(RecordId),
}

#[derive(Debug)]
pub struct RecordManager {
    schema: ModuleSchema,
    records: Vec<Record>,
    filter: String,
    page: usize,
    next_id: u64,
    tickets: TicketCounter,
    pending: Option<(PendingMutation, Prompt)>,
}

impl RecordManager {
    pub fn new(schema: ModuleSchema, seed: Vec<Record>) -> Self {
        let next_id = seed.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        Self {
            schema,
            records: seed,
            filter: String::new(),
            page: 1,
            next_id,
            tickets: TicketCounter::default(),
            pending: None,
        }
    }

    pub fn schema(&self) -> &ModuleSchema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.pending.as_ref().map(|(_, prompt)| prompt)
    }

    pub fn status_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.status.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Sets the search text and returns to the first page
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_string();
        self.page = 1;
    }

    /// Selects a page, clamped into `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_text(record, &self.filter)
    }

    fn matches_text(&self, record: &Record, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let mut searchable = self.schema.searchable_fields().peekable();
        if searchable.peek().is_none() {
            return record.fields.values().any(|v| v.search_text().contains(needle));
        }
        searchable.any(|spec| {
            record
                .field(&spec.name)
                .is_some_and(|v| v.search_text().contains(needle))
        })
    }

    pub fn filtered(&self) -> Vec<&Record> {
        self.filtered_by(&self.filter)
    }

    fn filtered_by(&self, needle: &str) -> Vec<&Record> {
        self.records.iter().filter(|r| self.matches_text(r, needle)).collect()
    }

    pub fn total_pages(&self) -> usize {
        let matches = self.filtered().len();
        matches.div_ceil(self.schema.page_size).max(1)
    }

    /// Page of the manager's own filter and page selection
    pub fn view(&self) -> PageView {
        self.render(&self.filter, self.page)
    }

    /// Page for a caller-supplied filter and page, leaving the manager's own
    /// selection untouched. Filter text is trimmed and the page clamped, as
    /// `set_filter` and `set_page` would.
    pub fn view_for(&self, filter: &str, page: usize) -> PageView {
        self.render(filter.trim(), page)
    }

    fn render(&self, needle: &str, page: usize) -> PageView {
        let filtered = self.filtered_by(needle);
        let page_size = self.schema.page_size;
        let total_pages = filtered.len().div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let records = filtered
            .iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|r| (*r).clone())
            .collect();

        PageView {
            page,
            total_pages,
            total_matches: filtered.len(),
            page_size,
            records,
        }
    }

    pub fn stage(&mut self, op: Operation) -> Result<Prompt, RecordError> {
        match op {
            Operation::Add(input) => self.add(&input),
            Operation::Edit(id, input) => self.edit(id, &input),
            Operation::AdvanceStatus(id) => self.toggle_status(id),
            Operation::Remove(id) => self.remove(id),
        }
    }

    pub fn add(&mut self, input: &FieldInput) -> Result<Prompt, RecordError> {
        self.ensure_idle()?;
        let fields = self.validate_new(input)?;
        let prompt = Prompt::new(format!("Add to {}?", self.schema.title), "A new record will be created");
        Ok(self.park(PendingMutation::Add { fields }, prompt))
    }

    pub fn edit(&mut self, id: RecordId, input: &FieldInput) -> Result<Prompt, RecordError> {
        self.ensure_idle()?;
        if self.get(id).is_none() {
            return Err(RecordError::NotFound(id));
        }
        let (set, clear) = self.validate_changes(input)?;
        let prompt = Prompt::new(format!("Save record {}?", id), "The listed fields will be replaced");
        Ok(self.park(PendingMutation::Edit { id, set, clear }, prompt))
    }

    /// Stages the next status in the module's cycle; the announced target is
    /// exactly what `confirm` applies.
    pub fn toggle_status(&mut self, id: RecordId) -> Result<Prompt, RecordError> {
        self.ensure_idle()?;
        let record = self.get(id).ok_or(RecordError::NotFound(id))?;
        let from = record.status.clone();
        let to = self.schema.statuses.next(&from).to_string();
        let prompt = Prompt::new(
            "Change status?",
            format!("Current status is \"{}\", it will become \"{}\"", from, to),
        );
        Ok(self.park(PendingMutation::SetStatus { id, to }, prompt))
    }

    pub fn cycle_status(&mut self, id: RecordId) -> Result<Prompt, RecordError> {
        self.toggle_status(id)
    }

    pub fn remove(&mut self, id: RecordId) -> Result<Prompt, RecordError> {
        self.ensure_idle()?;
        let prompt = Prompt::new(format!("Delete record {}?", id), "This cannot be undone");
        Ok(self.park(PendingMutation::Remove { id }, prompt))
    }

    /// Applies the staged mutation. `None` means it was accepted but changed nothing.
    pub fn confirm(&mut self) -> Result<Option<Acknowledgement>, RecordError> {
        let (mutation, _) = self.pending.take().ok_or(RecordError::NothingPending)?;
        let ack = match mutation {
            PendingMutation::Add { fields } => {
                let id = RecordId(self.next_id);
                self.next_id += 1;
                let record = Record::new(id, fields, self.schema.default_status.clone());
                self.records.insert(0, record);
                tracing::info!(module = %self.schema.slug, %id, "record added");
                Some(Acknowledgement::new(format!("Record {} added", id)))
            }
            PendingMutation::Edit { id, set, clear } => {
                self.records.iter_mut().find(|r| r.id == id).map(|record| {
                    for name in &clear {
                        record.fields.remove(name);
                    }
                    record.fields.extend(set);
                    tracing::info!(module = %self.schema.slug, %id, "record updated");
                    Acknowledgement::new(format!("Record {} updated", id))
                })
            }
            PendingMutation::SetStatus { id, to } => {
                self.records.iter_mut().find(|r| r.id == id).map(|record| {
                    record.status = to.clone();
                    tracing::info!(module = %self.schema.slug, %id, status = %to, "status changed");
                    Acknowledgement::new(format!("Status updated to \"{}\"", to))
                })
            }
            PendingMutation::Remove { id } => {
                let before = self.records.len();
                self.records.retain(|r| r.id != id);
                if self.records.len() == before {
                    tracing::debug!(module = %self.schema.slug, %id, "remove of absent record ignored");
                    None
                } else {
                    tracing::info!(module = %self.schema.slug, %id, "record deleted");
                    Some(Acknowledgement::new(format!("Record {} deleted", id)))
                }
            }
        };
        Ok(ack)
    }

    /// `confirm`, but only for the change identified by `ticket`
    pub fn confirm_ticket(&mut self, ticket: u64) -> Result<Option<Acknowledgement>, RecordError> {
        check_ticket(self.pending_prompt(), ticket)?;
        self.confirm()
    }

    pub fn decline(&mut self) -> Result<(), RecordError> {
        self.pending.take().ok_or(RecordError::NothingPending)?;
        tracing::debug!(module = %self.schema.slug, "pending change declined");
        Ok(())
    }

    pub fn decline_ticket(&mut self, ticket: u64) -> Result<(), RecordError> {
        check_ticket(self.pending_prompt(), ticket)?;
        self.decline()
    }

    fn ensure_idle(&self) -> Result<(), RecordError> {
        if self.schema.read_only {
            return Err(RecordError::ReadOnly(self.schema.slug.clone()));
        }
        if self.pending.is_some() {
            return Err(RecordError::ConfirmationPending);
        }
        Ok(())
    }

    fn park(&mut self, mutation: PendingMutation, prompt: Prompt) -> Prompt {
        let prompt = self.tickets.issue(prompt);
        self.pending = Some((mutation, prompt.clone()));
        prompt
    }

    fn validate_new(&self, input: &FieldInput) -> Result<BTreeMap<String, FieldValue>, RecordError> {
        self.reject_unknown(input)?;
        let mut fields = BTreeMap::new();
        for spec in &self.schema.fields {
            let raw = input.get(&spec.name).map(|s| s.trim()).unwrap_or("");
            if raw.is_empty() {
                if spec.required {
                    return Err(RecordError::validation(&spec.name, "is required"));
                }
                continue;
            }
            fields.insert(spec.name.clone(), Self::parse_value(&spec.name, spec.numeric, raw)?);
        }
        Ok(fields)
    }

    fn validate_changes(
        &self,
        input: &FieldInput,
    ) -> Result<(BTreeMap<String, FieldValue>, Vec<String>), RecordError> {
        self.reject_unknown(input)?;
        let mut set = BTreeMap::new();
        let mut clear = Vec::new();
        for (name, raw) in input {
            // reject_unknown guarantees the spec exists
            let Some(spec) = self.schema.field(name) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                if spec.required {
                    return Err(RecordError::validation(name, "is required"));
                }
                clear.push(name.clone());
                continue;
            }
            set.insert(name.clone(), Self::parse_value(name, spec.numeric, raw)?);
        }
        Ok((set, clear))
    }

    fn reject_unknown(&self, input: &FieldInput) -> Result<(), RecordError> {
        match input.keys().find(|k| self.schema.field(k).is_none()) {
            Some(name) => Err(RecordError::validation(name, "is not a field of this module")),
            None => Ok(()),
        }
    }

    fn parse_value(name: &str, numeric: bool, raw: &str) -> Result<FieldValue, RecordError> {
        if !numeric {
            return Ok(FieldValue::Text(raw.to_string()));
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(FieldValue::Number(n)),
            _ => Err(RecordError::validation(name, "must be a number")),
        }
    }
}

/// Stages `op`, waits for the confirmer, then applies or drops it
pub async fn run_confirmed(
    manager: &mut RecordManager,
    op: Operation,
    confirmer: &dyn Confirmer,
) -> Result<Resolution, RecordError> {
    let prompt = manager.stage(op)?;
    if confirmer.confirm(&prompt).await {
        Ok(Resolution::from_ack(manager.confirm()?))
    } else {
        manager.decline()?;
        Ok(Resolution::Declined)
    }
}
