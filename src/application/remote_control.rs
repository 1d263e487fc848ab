// Remote control - per-dock device switches behind the confirmation flow
use crate::application::confirmation::{check_ticket, Acknowledgement, Prompt, TicketCounter};
use crate::application::error::RecordError;
use crate::domain::dock::{DeviceSwitch, Dock};

#[derive(Debug, Clone, PartialEq)]
struct PendingToggle {
    dock: u32,
    device: u32,
    enable: bool,
}

#[derive(Debug)]
pub struct RemoteControl {
    docks: Vec<Dock>,
    tickets: TicketCounter,
    pending: Option<(PendingToggle, Prompt)>,
}

impl RemoteControl {
    pub fn new(docks: Vec<Dock>) -> Self {
        Self {
            docks,
            tickets: TicketCounter::default(),
            pending: None,
        }
    }

    pub fn docks(&self) -> &[Dock] {
        &self.docks
    }

    pub fn dock(&self, id: u32) -> Result<&Dock, RecordError> {
        self.docks
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| RecordError::UnknownTarget(format!("dock {}", id)))
    }

    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.pending.as_ref().map(|(_, prompt)| prompt)
    }

    /// Devices on a dock whose name contains `text`
    pub fn search(&self, dock: u32, text: &str) -> Result<Vec<DeviceSwitch>, RecordError> {
        let needle = text.trim();
        Ok(self
            .dock(dock)?
            .devices
            .iter()
            .filter(|d| d.name.contains(needle))
            .cloned()
            .collect())
    }

    pub fn request_toggle(&mut self, dock: u32, device: u32) -> Result<Prompt, RecordError> {
        if self.pending.is_some() {
            return Err(RecordError::ConfirmationPending);
        }
        let target = self.dock(dock)?;
        let switch = target
            .device(device)
            .ok_or_else(|| RecordError::UnknownTarget(format!("device {} on dock {}", device, dock)))?;

        let enable = !switch.enabled;
        let verb = if enable { "Enable" } else { "Disable" };
        let prompt = Prompt::new(
            format!("{} {}?", verb, switch.name),
            format!("{} / {}", target.name, switch.name),
        );
        let prompt = self.tickets.issue(prompt);
        self.pending = Some((PendingToggle { dock, device, enable }, prompt.clone()));
        Ok(prompt)
    }

    pub fn confirm(&mut self) -> Result<Acknowledgement, RecordError> {
        let (toggle, _) = self.pending.take().ok_or(RecordError::NothingPending)?;
        let dock = self
            .docks
            .iter_mut()
            .find(|d| d.id == toggle.dock)
            .ok_or_else(|| RecordError::UnknownTarget(format!("dock {}", toggle.dock)))?;
        let switch = dock
            .device_mut(toggle.device)
            .ok_or_else(|| RecordError::UnknownTarget(format!("device {}", toggle.device)))?;

        switch.enabled = toggle.enable;
        tracing::info!(dock = toggle.dock, device = toggle.device, enabled = toggle.enable, "device switched");
        let verb = if toggle.enable { "enabled" } else { "disabled" };
        Ok(Acknowledgement::new(format!("{} {}", switch.name, verb)))
    }

    pub fn confirm_ticket(&mut self, ticket: u64) -> Result<Acknowledgement, RecordError> {
        check_ticket(self.pending_prompt(), ticket)?;
        self.confirm()
    }

    pub fn decline(&mut self) -> Result<(), RecordError> {
        self.pending.take().ok_or(RecordError::NothingPending)?;
        Ok(())
    }

    pub fn decline_ticket(&mut self, ticket: u64) -> Result<(), RecordError> {
        check_ticket(self.pending_prompt(), ticket)?;
        self.decline()
    }
}
