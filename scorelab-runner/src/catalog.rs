//! Built-in instrument catalog.
//!
//! Each instrument's history lives at `<data_dir>/<CODE>_<NUMBER>_data.csv`.

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub name: &'static str,
    pub code: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

impl Instrument {
    pub fn data_file(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}_{}_data.csv", self.code, self.number))
    }
}

static INSTRUMENTS: [Instrument; 4] = [
    Instrument {
        name: "AuMas Resources Bhd",
        code: "AUMAS",
        number: "0098",
        description: "Investment holding; segments include aquaculture operations",
    },
    Instrument {
        name: "MN Holdings Bhd",
        code: "MNHLDG",
        number: "0245",
        description: "Infrastructure utilities construction",
    },
    Instrument {
        name: "Pharmaniaga Bhd",
        code: "PHARMA",
        number: "7081",
        description: "R&D and manufacturing of generic pharmaceutical products",
    },
    Instrument {
        name: "Zetrix AI Bhd",
        code: "ZETRIX",
        number: "0138",
        description: "Digital services and blockchain infrastructure",
    },
];

pub fn instruments() -> &'static [Instrument] {
    &INSTRUMENTS
}

/// Look up an instrument by code, ignoring case.
pub fn find(code: &str) -> Option<&'static Instrument> {
    let code = code.trim();
    INSTRUMENTS
        .iter()
        .find(|inst| inst.code.eq_ignore_ascii_case(code))
}
