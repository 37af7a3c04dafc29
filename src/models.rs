use serde::{Deserialize, Serialize};

/// A single cell row from the parsed radio plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioPlanCell {
    pub cell_id: String,
    pub technology: String,
    pub antenna_type: String,
    pub m_tilt: Option<f64>,
    pub e_tilt: Option<f64>,
    pub feed_length: Option<f64>,
    pub cable_type: String,
    pub jumpers: String,
}

/// A sector summary from the parsed radio plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioPlanSector {
    pub id: String,
    pub azimuth: f64,
    pub m_tilt: f64,
    pub e_tilt: f64,
    pub antennas: Vec<String>,
    pub technologies: Vec<String>,
    pub cells: Vec<RadioPlanCell>,
    pub feed_length: Option<f64>,
    pub cable_type: String,
    pub jumpers: String,
}

/// Structured extraction of the radio plan document (the required import input)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioPlan {
    pub site_id: String,
    pub project: String,
    pub config: String,
    pub total_cells: u32,
    pub sectors: Vec<RadioPlanSector>,
    pub raw_rows: Vec<RadioPlanCell>,
}

impl RadioPlan {
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn azimuths(&self) -> Vec<f64> {
        self.sectors.iter().map(|s| s.azimuth).collect()
    }

    /// Distinct technologies across all sectors, in first-seen order
    pub fn technology_set(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for sector in &self.sectors {
            for tech in &sector.technologies {
                if !seen.contains(tech) {
                    seen.push(tech.clone());
                }
            }
        }
        seen
    }
}

/// A single DC cable run from the power calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DcCableRun {
    pub sector: u32,
    pub band: String,
    pub length_m: f64,
    pub cross_section: f64,
}

/// Structured extraction of the power calculator worksheet (the optional
/// import input)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PowerCalc {
    pub rectifier_modules: u32,
    pub rectifier_model: String,
    pub rectifier_is_new: bool,
    pub max_modules: u32,
    pub battery_strings: u32,
    pub dc_cables: Vec<DcCableRun>,
}

/// Parsed radio configuration string.
///
/// Config string format: `[N]<sector sizes>_`
///   N = New site (optional prefix - fresh install, not upgrade/swap)
///   L = Large sector (NR + LTE + mMIMO)
///   M = Medium sector (LTE + NR, no mMIMO)
///   S = Small sector (LTE only)
///   _ = terminator
///
/// Examples: `NLLL_` = new site with 3 Large sectors, `LLL_` = existing-site
/// upgrade with 3 Large sectors, `NM_` = new site with 1 Medium sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfig {
    pub is_new: bool,
    pub sector_sizes: Vec<char>,
    pub large_count: usize,
    pub medium_count: usize,
    pub small_count: usize,
    pub raw: String,
}

impl ParsedConfig {
    pub fn sector_count(&self) -> usize {
        self.sector_sizes.len()
    }

    /// Site size classification: the largest sector size present
    pub fn site_size(&self) -> &'static str {
        if self.large_count > 0 {
            "Large"
        } else if self.medium_count > 0 {
            "Medium"
        } else {
            "Small"
        }
    }
}

/// Parse a config string like `NLLL_` into structured data
pub fn parse_config(config: &str) -> ParsedConfig {
    let mut rest = config.trim_end_matches('_');

    let is_new = rest.starts_with('N');
    if is_new {
        rest = &rest[1..];
    }

    let sector_sizes: Vec<char> = rest.chars().filter(|c| "LMS".contains(*c)).collect();
    let large_count = sector_sizes.iter().filter(|c| **c == 'L').count();
    let medium_count = sector_sizes.iter().filter(|c| **c == 'M').count();
    let small_count = sector_sizes.iter().filter(|c| **c == 'S').count();

    ParsedConfig {
        is_new,
        sector_sizes,
        large_count,
        medium_count,
        small_count,
        raw: config.to_string(),
    }
}
