// Post-import questionnaire.
//
// A handful of categorical fields cannot be read out of the parsed
// documents: how the site is accessed, whether a crane is needed, what
// cabinet is installed, whether this is a fresh build. Kickstart seeds a
// short form from the parsed radio plan and translates the answers into
// working-document field updates.

use crate::models::RadioPlan;
use serde_json::{json, Value};

/// Values pre-read from the parsed radio plan to seed the questionnaire
#[derive(Debug, Clone, PartialEq)]
pub struct KickstartSeed {
    pub site_id: String,
    pub sector_count: usize,
    pub azimuths: Vec<f64>,
    pub technologies: Vec<String>,
}

impl KickstartSeed {
    pub fn from_radio_plan(plan: &RadioPlan) -> Self {
        Self {
            site_id: plan.site_id.clone(),
            sector_count: plan.sector_count(),
            azimuths: plan.azimuths(),
            technologies: plan.technology_set(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteCategory {
    Rooftop,
    Tower,
    Greenfield,
    Indoor,
}

impl SiteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteCategory::Rooftop => "Rooftop",
            SiteCategory::Tower => "Tower",
            SiteCategory::Greenfield => "Greenfield",
            SiteCategory::Indoor => "Indoor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinetType {
    Indoor,
    Outdoor,
    OutdoorCompact,
}

impl CabinetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinetType::Indoor => "Indoor",
            CabinetType::Outdoor => "Outdoor",
            CabinetType::OutdoorCompact => "Outdoor compact",
        }
    }

    /// Site model label implied by the installed cabinet
    pub fn model_label(&self) -> &'static str {
        match self {
            CabinetType::Indoor => "RBS 6131",
            CabinetType::Outdoor => "RBS 6150",
            CabinetType::OutdoorCompact => "RBS 6120",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    NewSite,
    Upgrade,
    Swap,
}

/// Answers from the questionnaire. Every question is optional: unanswered
/// questions (or an outright skip) leave the working document alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KickstartAnswers {
    pub site_category: Option<SiteCategory>,
    pub crane_needed: Option<bool>,
    pub roof_type: Option<String>,
    pub cabinet_type: Option<CabinetType>,
    pub build_type: Option<BuildType>,
}

impl KickstartAnswers {
    /// Translate the answers into `(field key, value)` working-document
    /// updates. `config` is the parsed config string the build-type
    /// transform applies to.
    pub fn to_field_updates(&self, config: &str) -> Vec<(&'static str, Value)> {
        let mut updates = Vec::new();

        if let Some(category) = self.site_category {
            updates.push(("siteCategory", json!(category.as_str())));
        }
        if let Some(crane) = self.crane_needed {
            updates.push(("craneNeeded", json!(crane)));
        }
        if let Some(ref roof) = self.roof_type {
            updates.push(("roofType", json!(roof)));
        }
        if let Some(cabinet) = self.cabinet_type {
            updates.push(("cabinetType", json!(cabinet.as_str())));
            updates.push(("siteModel", json!(cabinet.model_label())));
        }
        if let Some(build) = self.build_type {
            updates.push(("config", json!(apply_build_type(config, build))));
        }

        updates
    }
}

/// Rewrite the config string's leading marker for the chosen build type:
/// `N` prefixes a fresh install, upgrades and swaps carry no prefix.
pub fn apply_build_type(config: &str, build: BuildType) -> String {
    let stripped = config.strip_prefix('N').unwrap_or(config);
    match build {
        BuildType::NewSite => format!("N{}", stripped),
        BuildType::Upgrade | BuildType::Swap => stripped.to_string(),
    }
}
