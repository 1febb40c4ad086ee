//! The four fixed disease keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pancreatic condition scored by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    /// `acute_pancreatitis`
    AcutePancreatitis,
    /// `chronic_pancreatitis`
    ChronicPancreatitis,
    /// `pancreatic_cysts`
    PancreaticCysts,
    /// `pancreatic_cancer`
    PancreaticCancer,
}

impl Disease {
    /// All keys, in key order
    pub const ALL: [Disease; 4] = [
        Disease::AcutePancreatitis,
        Disease::ChronicPancreatitis,
        Disease::PancreaticCysts,
        Disease::PancreaticCancer,
    ];

    /// Snake-case key, as used in serialized results
    pub fn key(&self) -> &'static str {
        match self {
            Disease::AcutePancreatitis => "acute_pancreatitis",
            Disease::ChronicPancreatitis => "chronic_pancreatitis",
            Disease::PancreaticCysts => "pancreatic_cysts",
            Disease::PancreaticCancer => "pancreatic_cancer",
        }
    }

    /// Title-case name, e.g. "Acute Pancreatitis"
    pub fn display_name(&self) -> &'static str {
        match self {
            Disease::AcutePancreatitis => "Acute Pancreatitis",
            Disease::ChronicPancreatitis => "Chronic Pancreatitis",
            Disease::PancreaticCysts => "Pancreatic Cysts",
            Disease::PancreaticCancer => "Pancreatic Cancer",
        }
    }

    /// Static explanatory text shown with results
    pub fn explanation(&self) -> &'static str {
        match self {
            Disease::AcutePancreatitis => "Acute pancreatitis is inflammation of the pancreas that develops quickly. Common symptoms include severe abdominal pain, nausea, and vomiting. Early diagnosis and treatment are crucial for preventing complications.",
            Disease::ChronicPancreatitis => "Chronic pancreatitis is long-term inflammation that progressively damages the pancreas. It can lead to diabetes and digestive problems. Management focuses on pain control and enzyme replacement.",
            Disease::PancreaticCysts => "Pancreatic cysts are fluid-filled sacs that can develop in the pancreas. Most are benign, but some may require monitoring or treatment depending on their characteristics and growth pattern.",
            Disease::PancreaticCancer => "Pancreatic cancer is a serious condition that requires immediate medical attention. Early detection significantly improves treatment outcomes. Symptoms may include abdominal pain, weight loss, and jaundice.",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Disease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disease::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| format!("unknown disease key: {}", s))
    }
}
