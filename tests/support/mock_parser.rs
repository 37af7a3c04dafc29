use async_trait::async_trait;
use siteforge::models::{PowerCalc, RadioPlan};
use siteforge::parser_client::{DocumentParser, ParserError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Returns canned parse results; either document type can be made to fail.
pub struct MockParser {
    radio_plan: Mutex<RadioPlan>,
    power_calc: Mutex<PowerCalc>,
    fail_radio_plan: AtomicBool,
    fail_power_calc: AtomicBool,
}

impl MockParser {
    pub fn new(radio_plan: RadioPlan) -> Self {
        Self {
            radio_plan: Mutex::new(radio_plan),
            power_calc: Mutex::new(PowerCalc {
                rectifier_model: "NetSure 5100".to_string(),
                rectifier_modules: 3,
                ..Default::default()
            }),
            fail_radio_plan: AtomicBool::new(false),
            fail_power_calc: AtomicBool::new(false),
        }
    }

    pub fn fail_radio_plan(&self) {
        self.fail_radio_plan.store(true, Ordering::SeqCst);
    }

    pub fn fail_power_calc(&self) {
        self.fail_power_calc.store(true, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        self.fail_radio_plan.store(false, Ordering::SeqCst);
        self.fail_power_calc.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentParser for MockParser {
    async fn parse_radio_plan(&self, _bytes: &[u8]) -> Result<RadioPlan, ParserError> {
        if self.fail_radio_plan.load(Ordering::SeqCst) {
            return Err(ParserError::Rejected("not a radio plan".to_string()));
        }
        Ok(self.radio_plan.lock().unwrap().clone())
    }

    async fn parse_power_calc(&self, _bytes: &[u8]) -> Result<PowerCalc, ParserError> {
        if self.fail_power_calc.load(Ordering::SeqCst) {
            return Err(ParserError::Rejected("not a power calculator".to_string()));
        }
        Ok(self.power_calc.lock().unwrap().clone())
    }
}
