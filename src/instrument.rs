use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::PrepError;

/// Run center reported when only the machine family, not the unit, is known.
pub const DEFAULT_RUN_CENTER: &str = "UCSDMI";

static MACHINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{1,2}").expect("machine code pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentRecord {
    pub serial: &'static str,
    pub machine_prefix: &'static str,
    pub model: &'static str,
    pub machine_type: &'static str,
    pub run_center: &'static str,
}

/// Sequencers we know by serial number.
pub const INSTRUMENTS: &[InstrumentRecord] = &[
    InstrumentRecord {
        serial: "A00953",
        machine_prefix: "A",
        model: "Illumina NovaSeq 6000",
        machine_type: "NovaSeq",
        run_center: "IGM",
    },
    InstrumentRecord {
        serial: "A00169",
        machine_prefix: "A",
        model: "Illumina NovaSeq 6000",
        machine_type: "NovaSeq",
        run_center: "LJI",
    },
    InstrumentRecord {
        serial: "M05314",
        machine_prefix: "M",
        model: "Illumina MiSeq",
        machine_type: "MiSeq",
        run_center: "KLM",
    },
    InstrumentRecord {
        serial: "K00180",
        machine_prefix: "K",
        model: "Illumina HiSeq 4000",
        machine_type: "HiSeq",
        run_center: "IGM",
    },
    InstrumentRecord {
        serial: "D00611",
        machine_prefix: "D",
        model: "Illumina HiSeq 2500",
        machine_type: "HiSeq/RR",
        run_center: "IGM",
    },
    InstrumentRecord {
        serial: "MN01225",
        machine_prefix: "MN",
        model: "Illumina MiniSeq",
        machine_type: "MiniSeq",
        run_center: "CMI",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub model: String,
    pub run_center: String,
}

pub fn lookup_serial(serial: &str) -> Option<&'static InstrumentRecord> {
    INSTRUMENTS.iter().find(|record| record.serial == serial)
}

pub fn lookup_family(machine_prefix: &str) -> Option<&'static InstrumentRecord> {
    INSTRUMENTS
        .iter()
        .find(|record| record.machine_prefix == machine_prefix)
}

/// One or two leading letters of an instrument serial, e.g. `MN` for `MN01225`.
pub fn machine_code(serial: &str) -> Result<&str, PrepError> {
    MACHINE_CODE_RE
        .find(serial)
        .map(|found| found.as_str())
        .ok_or_else(|| PrepError::InvalidMachineCode(serial.to_string()))
}

/// Resolves the model and run center for the instrument code of a run id.
///
/// Exact serial matches report the unit's own run center. Unknown serials
/// fall back to their machine family and report [`DEFAULT_RUN_CENTER`].
pub fn resolve_instrument(instrument_code: &str) -> Result<Instrument, PrepError> {
    let serial = instrument_code
        .split_once('_')
        .map_or(instrument_code, |(serial, _)| serial);

    if let Some(record) = lookup_serial(serial) {
        return Ok(Instrument {
            model: record.model.to_string(),
            run_center: record.run_center.to_string(),
        });
    }

    let prefix = machine_code(serial)?;
    let record =
        lookup_family(prefix).ok_or_else(|| PrepError::UnknownInstrument(serial.to_string()))?;
    tracing::debug!(serial, prefix, model = record.model, "resolved instrument by family");

    Ok(Instrument {
        model: record.model.to_string(),
        run_center: DEFAULT_RUN_CENTER.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serials_are_unique() {
        for (i, record) in INSTRUMENTS.iter().enumerate() {
            assert!(
                INSTRUMENTS[i + 1..]
                    .iter()
                    .all(|other| other.serial != record.serial)
            );
        }
    }

    #[test]
    fn families_share_one_model() {
        for record in INSTRUMENTS {
            let family = lookup_family(record.machine_prefix).unwrap();
            assert_eq!(family.model, record.model);
        }
    }

    #[test]
    fn machine_prefix_matches_serial() {
        for record in INSTRUMENTS {
            assert_eq!(machine_code(record.serial).unwrap(), record.machine_prefix);
        }
    }
}
