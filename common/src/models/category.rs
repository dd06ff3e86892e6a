use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Equipment category as understood by the inventory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Computer,
    Monitor,
    Printer,
    Network,
    Server,
    Mobile,
    Peripheral,
    Other,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 8] = [
        Self::Computer,
        Self::Monitor,
        Self::Printer,
        Self::Network,
        Self::Server,
        Self::Mobile,
        Self::Peripheral,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Computer => "computer",
            Self::Monitor => "monitor",
            Self::Printer => "printer",
            Self::Network => "network",
            Self::Server => "server",
            Self::Mobile => "mobile",
            Self::Peripheral => "peripheral",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == lower)
            .ok_or_else(|| format!("unknown equipment category: {s}"))
    }
}

/// Lifecycle status of an equipment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    InUse,
    #[default]
    InStock,
    InRepair,
    WrittenOff,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InUse => "in_use",
            Self::InStock => "in_stock",
            Self::InRepair => "in_repair",
            Self::WrittenOff => "written_off",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_use" => Ok(Self::InUse),
            "in_stock" => Ok(Self::InStock),
            "in_repair" => Ok(Self::InRepair),
            "written_off" => Ok(Self::WrittenOff),
            _ => Err(format!("unknown equipment status: {s}")),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
