//! Line-oriented body-definition files
//!
//! Layout (lines are 1-based here, the stored index is 0-based):
//!
//! ```text
//! <free text>
//! <index N of the epoch line>
//! ...
//! YYYY MM DD HH MM SS MS        <- line N + 1
//! <free text>
//! TYPE NAME SATELLITES NODE INCL PERI A_SIG A_EXP ECC MEAN M_SIG M_EXP
//! ...
//! ```
//!
//! Body records start two lines after the epoch line. Each record is
//! followed by its satellites' subtrees, depth first; a subtree's extent is
//! determined by the satellite counts of the records inside it. Angles are
//! radians, lengths metres, masses kilograms written as `sig × 10^exp`.
//! Blank lines in the record section are skipped.

use chrono::{DateTime, NaiveDate, Utc};
use kepler::{AnomalySolver, Composition, OrbitalElements, StarProperties};
use log::debug;
use serde::{Deserialize, Serialize};
use units::{Length, Mass};

use crate::analytic;
use crate::body::{Body, BodyId};
use crate::error::{OrreryError, Result};
use crate::system::SystemState;

/// Columns every body record must carry
pub const RECORD_COLUMNS: usize = 12;

const TYPE: usize = 0;
const NAME: usize = 1;
const SATELLITES: usize = 2;
const ASCENDING_NODE: usize = 3;
const INCLINATION: usize = 4;
const PERIAPSIS_ARGUMENT: usize = 5;
const SEMI_MAJOR_SIG: usize = 6;
const SEMI_MAJOR_EXP: usize = 7;
const ECCENTRICITY: usize = 8;
const MEAN_ANOMALY: usize = 9;
const MASS_SIG: usize = 10;
const MASS_EXP: usize = 11;

/// Record type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordType {
    Star,
    Planet,
}

/// One parsed record together with its satellites
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDefinition {
    pub record_type: RecordType,
    pub name: String,
    pub mass: Mass,
    /// Ignored for roots
    pub elements: OrbitalElements,
    pub satellites: Vec<BodyDefinition>,
    /// 1-based source line
    pub line: usize,
}

impl BodyDefinition {
    /// Number of records in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self
            .satellites
            .iter()
            .map(BodyDefinition::subtree_len)
            .sum::<usize>()
    }
}

/// A parsed body file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDefinition {
    pub epoch: DateTime<Utc>,
    pub roots: Vec<BodyDefinition>,
}

impl SystemDefinition {
    pub fn body_count(&self) -> usize {
        self.roots.iter().map(BodyDefinition::subtree_len).sum()
    }

    /// Builds a [`SystemState`] with every record in place at time zero.
    ///
    /// Stars are given Sun-like radiative properties and planets an
    /// Earth-like composition. Nothing is returned unless every orbit is
    /// valid.
    pub fn instantiate(&self, g: f64, solver: AnomalySolver) -> Result<SystemState> {
        let mut state = SystemState::new(g).with_epoch(self.epoch);
        for root in &self.roots {
            add_subtree(&mut state, root, None, solver)?;
        }
        analytic::place(&mut state);

        debug!(
            "Instantiated {} bodies at epoch {}",
            state.body_count(),
            self.epoch
        );
        Ok(state)
    }
}

fn add_subtree(
    state: &mut SystemState,
    definition: &BodyDefinition,
    primary: Option<BodyId>,
    solver: AnomalySolver,
) -> Result<()> {
    let body = match definition.record_type {
        RecordType::Star => Body::star(
            definition.name.as_str(),
            definition.mass,
            StarProperties::sun_like(),
        ),
        RecordType::Planet => Body::planet(
            definition.name.as_str(),
            definition.mass,
            Composition::earth_like(),
        ),
    };

    let id = match primary {
        Some(primary) => state.add_orbiting_body(body, primary, definition.elements, solver)?,
        None => state.add_body(body),
    };

    for satellite in &definition.satellites {
        add_subtree(state, satellite, Some(id), solver)?;
    }
    Ok(())
}

/// Parses a complete body file
///
/// # Examples
///
/// ```
/// use orrery::loader::parse_system;
///
/// let source = "Example\n2\n2000 1 1\n\nStar Sun 1 0 0 0 0 0 0 0 1.989 30\nPlanet Earth 0 0 0 0 1.496 11 0.0167 0 5.972 24\n";
/// let definition = parse_system(source).unwrap();
///
/// assert_eq!(definition.roots[0].name, "Sun");
/// assert_eq!(definition.roots[0].satellites[0].name, "Earth");
/// ```
pub fn parse_system(source: &str) -> Result<SystemDefinition> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.iter().all(|l| l.trim().is_empty()) {
        return Err(OrreryError::EmptyDefinition);
    }

    let index_text = lines.get(1).map(|l| l.trim()).unwrap_or_default();
    let epoch_index: usize = index_text.parse().map_err(|_| OrreryError::Parse {
        line: 2,
        message: format!("expected the epoch line index, found '{index_text}'"),
    })?;

    let epoch_text = lines.get(epoch_index).ok_or_else(|| OrreryError::Parse {
        line: epoch_index + 1,
        message: "epoch line is past the end of the file".to_string(),
    })?;
    let epoch = parse_epoch(epoch_text, epoch_index + 1)?;

    let records: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .skip(epoch_index + 2)
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| (index + 1, *text))
        .collect();

    let mut roots = Vec::new();
    let mut cursor = 0;
    while cursor < records.len() {
        roots.push(parse_subtree(&records, &mut cursor, false)?);
    }

    let definition = SystemDefinition { epoch, roots };
    debug!(
        "Parsed {} records in {} root(s), epoch {}",
        definition.body_count(),
        definition.roots.len(),
        definition.epoch
    );
    Ok(definition)
}

fn parse_subtree(
    records: &[(usize, &str)],
    cursor: &mut usize,
    has_primary: bool,
) -> Result<BodyDefinition> {
    let (line, text) = records[*cursor];
    *cursor += 1;

    let columns: Vec<&str> = text.split_whitespace().collect();
    if columns.len() < RECORD_COLUMNS {
        return Err(OrreryError::TooFewColumns {
            line,
            expected: RECORD_COLUMNS,
            found: columns.len(),
        });
    }

    let record_type = match columns[TYPE] {
        "Star" => RecordType::Star,
        "Planet" => RecordType::Planet,
        other => {
            return Err(OrreryError::UnknownBodyType {
                line,
                kind: other.to_string(),
            })
        }
    };
    let name = columns[NAME].to_string();
    if record_type == RecordType::Planet && !has_primary {
        return Err(OrreryError::MissingPrimary { line, name });
    }

    let satellite_count: usize = parse_column(&columns, SATELLITES, line, "satellite count")?;
    let elements = OrbitalElements {
        semi_major_axis: Length::from_scientific(
            parse_column(&columns, SEMI_MAJOR_SIG, line, "semi-major axis")?,
            parse_column(&columns, SEMI_MAJOR_EXP, line, "semi-major exponent")?,
        ),
        eccentricity: parse_column(&columns, ECCENTRICITY, line, "eccentricity")?,
        inclination: parse_column(&columns, INCLINATION, line, "inclination")?,
        longitude_ascending_node: parse_column(&columns, ASCENDING_NODE, line, "ascending node")?,
        argument_of_periapsis: parse_column(&columns, PERIAPSIS_ARGUMENT, line, "periapsis argument")?,
        mean_anomaly: parse_column(&columns, MEAN_ANOMALY, line, "mean anomaly")?,
    };
    let mass = Mass::from_scientific(
        parse_column(&columns, MASS_SIG, line, "mass")?,
        parse_column(&columns, MASS_EXP, line, "mass exponent")?,
    );

    let mut satellites = Vec::with_capacity(satellite_count);
    for _ in 0..satellite_count {
        if *cursor >= records.len() {
            return Err(OrreryError::TruncatedSubtree {
                line,
                name,
                expected: satellite_count,
            });
        }
        satellites.push(parse_subtree(records, cursor, true)?);
    }

    Ok(BodyDefinition {
        record_type,
        name,
        mass,
        elements,
        satellites,
        line,
    })
}

fn parse_column<T: std::str::FromStr>(
    columns: &[&str],
    index: usize,
    line: usize,
    what: &str,
) -> Result<T> {
    let text = columns[index];
    text.parse().map_err(|_| OrreryError::Parse {
        line,
        message: format!("invalid {what} '{text}'"),
    })
}

/// Parses `YYYY [MM [DD [HH [MM [SS [MS]]]]]]` as a UTC instant.
///
/// Month and day default to 1, the remaining fields to 0.
pub fn parse_epoch(text: &str, line: usize) -> Result<DateTime<Utc>> {
    let invalid = || OrreryError::InvalidEpoch {
        line,
        value: text.trim().to_string(),
    };

    let mut fields = text.split_whitespace();
    let year: i32 = fields.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;

    let mut rest = [1u32, 1, 0, 0, 0, 0];
    for slot in rest.iter_mut() {
        match fields.next() {
            Some(field) => *slot = field.parse().map_err(|_| invalid())?,
            None => break,
        }
    }
    let [month, day, hour, minute, second, millis] = rest;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millis))
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}
