use crate::{
    counting::{plan::PlanError, CountingError},
    detector::DetectorError,
    nuclear::NuclearError,
    nuclide::NuclideError,
    scenario::ScenarioError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `nuclear` module")]
    Nuclear(#[from] NuclearError),
    #[error("Error in the `nuclide` module")]
    Nuclide(#[from] NuclideError),
    #[error("Error in the `detector` module")]
    Detector(#[from] DetectorError),
    #[error("Error in the `counting` module")]
    Counting(#[from] CountingError),
    #[error("Error in the `counting::plan` module")]
    Plan(#[from] PlanError),
    #[error("Error in the `scenario` module")]
    Scenario(#[from] ScenarioError),
}
