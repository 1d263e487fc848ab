// Dock domain model - berths and their remotely switchable devices
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSwitch {
    pub id: u32,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dock {
    pub id: u32,
    pub name: String,
    pub devices: Vec<DeviceSwitch>,
}

impl Dock {
    pub fn new(id: u32, devices: Vec<DeviceSwitch>) -> Self {
        Self {
            id,
            name: Self::format_name(id),
            devices,
        }
    }

    fn format_name(id: u32) -> String {
        format!("船席 {}", id)
    }

    pub fn device(&self, id: u32) -> Option<&DeviceSwitch> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn device_mut(&mut self, id: u32) -> Option<&mut DeviceSwitch> {
        self.devices.iter_mut().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        let dock = Dock::new(7, Vec::new());
        assert_eq!(dock.name, "船席 7");
    }
}
