//! Bet type catalog
//!
//! The set of bet types is closed: adding one means adding a `BetType`
//! variant, and every match over it below has to handle the new variant.

use std::str::FromStr;

use serde::Serialize;

use crate::{
    compare, parse_prediction, AuthoritativeResult, BetType, ComparisonResult, CoreError,
    Prediction, ValidationResult,
};

/// Static description of a bet type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetTypeDescriptor {
    #[serde(skip)]
    pub bet_type: BetType,
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Difficulty weight applied on top of the comparator's base points
    pub multiplier: f64,
}

impl BetTypeDescriptor {
    pub fn validate(&self, value: &str) -> ValidationResult {
        match parse_prediction(self.bet_type, value) {
            Ok(_) => ValidationResult::ok(),
            Err(e) => ValidationResult::invalid(e.to_string()),
        }
    }

    pub fn compare(
        &self,
        prediction: &Prediction,
        result: &AuthoritativeResult,
    ) -> Result<ComparisonResult, CoreError> {
        if prediction.bet_type() != self.bet_type {
            return Err(CoreError::MalformedResult(format!(
                "{} prediction scored as {}",
                prediction.bet_type(),
                self.bet_type
            )));
        }
        compare(prediction, result)
    }
}

static BET_TYPES: [BetTypeDescriptor; 8] = [
    BetTypeDescriptor {
        bet_type: BetType::ExactScore,
        id: "exact_score",
        name: "Resultado Exacto",
        icon: "🔢",
        description: "Predice el marcador final del partido",
        multiplier: 1.5,
    },
    BetTypeDescriptor {
        bet_type: BetType::MatchResult,
        id: "match_result",
        name: "1X2",
        icon: "🏆",
        description: "Victoria local, empate o victoria visitante",
        multiplier: 1.0,
    },
    BetTypeDescriptor {
        bet_type: BetType::TotalGoals,
        id: "total_goals",
        name: "Total de Goles",
        icon: "⚽",
        description: "Más/menos de cierta cantidad de goles",
        multiplier: 1.0,
    },
    BetTypeDescriptor {
        bet_type: BetType::Scorer,
        id: "scorer",
        name: "Goleador",
        icon: "👟",
        description: "Jugador que marcará gol",
        multiplier: 1.2,
    },
    BetTypeDescriptor {
        bet_type: BetType::CorrectMinute,
        id: "correct_minute",
        name: "Minuto de Gol",
        icon: "⏱️",
        description: "Minuto exacto en que se marcará un gol",
        multiplier: 1.8,
    },
    BetTypeDescriptor {
        bet_type: BetType::FirstScorer,
        id: "first_scorer",
        name: "Primer Goleador",
        icon: "1️⃣",
        description: "Jugador que marcará el primer gol",
        multiplier: 1.5,
    },
    BetTypeDescriptor {
        bet_type: BetType::ScoreAtHalf,
        id: "score_at_half",
        name: "Resultado al Descanso",
        icon: "🏁",
        description: "Marcador al final de la primera parte",
        multiplier: 1.4,
    },
    BetTypeDescriptor {
        bet_type: BetType::BothTeamsScore,
        id: "both_teams_score",
        name: "Ambos Equipos Marcan",
        icon: "🥅",
        description: "¿Marcarán gol ambos equipos?",
        multiplier: 1.1,
    },
];

/// All registered bet types, in the order they are offered to users
pub fn bet_types() -> &'static [BetTypeDescriptor] {
    &BET_TYPES
}

/// Look up a bet type by token, ignoring ASCII case.
///
/// Unknown tokens return `None`; there is no fallback type.
pub fn get_bet_type_by_id(id: &str) -> Option<&'static BetTypeDescriptor> {
    BET_TYPES
        .iter()
        .find(|descriptor| descriptor.id.eq_ignore_ascii_case(id))
}

impl BetType {
    pub fn from_id(id: &str) -> Option<BetType> {
        get_bet_type_by_id(id).map(|descriptor| descriptor.bet_type)
    }

    pub fn descriptor(self) -> &'static BetTypeDescriptor {
        match self {
            BetType::ExactScore => &BET_TYPES[0],
            BetType::MatchResult => &BET_TYPES[1],
            BetType::TotalGoals => &BET_TYPES[2],
            BetType::Scorer => &BET_TYPES[3],
            BetType::CorrectMinute => &BET_TYPES[4],
            BetType::FirstScorer => &BET_TYPES[5],
            BetType::ScoreAtHalf => &BET_TYPES[6],
            BetType::BothTeamsScore => &BET_TYPES[7],
        }
    }
}

impl FromStr for BetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetType::from_id(s).ok_or_else(|| CoreError::UnknownBetType(s.to_string()))
    }
}
