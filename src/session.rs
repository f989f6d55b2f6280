//! Wizard state carried between booking pages.
//!
//! Every page of the booking flow reads the values it needs from a single
//! typed [`WizardState`] stored in the signed session cookie. Handlers receive
//! a request-scoped [`Wizard`] and must ask for the specific values a step
//! depends on; a missing value is reported as [`AppError::MissingSession`].

use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::MealDealChoice};

const STATE_KEY: &str = "wizard";

/// Parameters of the initial room search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Search {
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub people: i64,
    pub nights: i64,
}

/// New stay parameters awaiting confirmation on the change-booking page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedChange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub people: i64,
    pub nights: i64,
    pub meal_deal: MealDealChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    Idle,
    SearchEntered,
    Booked,
    DetailsEntered,
    ChangeRequested,
    CancelRequested,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub search: Option<Search>,
    pub booking_number: Option<i64>,
    pub surname: Option<String>,
    pub change: Option<StagedChange>,
    /// Set once "Yes" was answered on the cancellation warning.
    #[serde(default)]
    pub cancel_confirmed: bool,
}

impl WizardState {
    pub fn stage(&self) -> WizardStage {
        match self {
            WizardState {
                booking_number: Some(_),
                cancel_confirmed: true,
                ..
            } => WizardStage::CancelRequested,
            WizardState {
                booking_number: Some(_),
                change: Some(_),
                ..
            } => WizardStage::ChangeRequested,
            WizardState {
                booking_number: Some(_),
                surname: Some(_),
                ..
            } => WizardStage::DetailsEntered,
            WizardState {
                booking_number: Some(_),
                ..
            } => WizardStage::Booked,
            WizardState {
                search: Some(_), ..
            } => WizardStage::SearchEntered,
            _ => WizardStage::Idle,
        }
    }

    pub fn require_search(&self) -> Result<&Search, AppError> {
        self.search.as_ref().ok_or(AppError::MissingSession("search"))
    }

    pub fn require_booking_number(&self) -> Result<i64, AppError> {
        self.booking_number
            .ok_or(AppError::MissingSession("booking_number"))
    }

    pub fn require_change(&self) -> Result<&StagedChange, AppError> {
        self.change.as_ref().ok_or(AppError::MissingSession("change"))
    }

    pub fn require_cancel_confirmed(&self) -> Result<(), AppError> {
        if self.cancel_confirmed {
            Ok(())
        } else {
            Err(AppError::MissingSession("cancel_confirmed"))
        }
    }

    /// Forgets the booking this session was managing.
    pub fn end_booking(&mut self) {
        self.booking_number = None;
        self.surname = None;
        self.change = None;
        self.cancel_confirmed = false;
    }
}

/// Request-scoped access to the wizard state of the caller's session.
pub struct Wizard {
    session: Session,
}

impl Wizard {
    pub fn load(&self) -> Result<WizardState, AppError> {
        self.session
            .get::<WizardState>(STATE_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|e| AppError::Session(e.to_string()))
    }

    pub fn save(&self, state: &WizardState) -> Result<(), AppError> {
        log::debug!("wizard stage is now {:?}", state.stage());
        self.session
            .insert(STATE_KEY, state)
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Loads the state, applies `f` and stores the result.
    pub fn update(&self, f: impl FnOnce(&mut WizardState)) -> Result<WizardState, AppError> {
        let mut state = self.load()?;
        f(&mut state);
        self.save(&state)?;
        Ok(state)
    }
}

impl FromRequest for Wizard {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Wizard {
            session: req.get_session(),
        }))
    }
}
