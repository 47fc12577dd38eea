//! Closed-tour game over the static city table.
//!
//! Starting from the home town the tourist visits every planned city exactly
//! once and then returns home. Moves are city names.

use crate::geo::{coordinates, distance_km};
use montecarlo_core::{Game, MctsError, Result};
use std::collections::HashSet;
use std::fmt;

/// Numerator of the tour score: a tour of `TOUR_SCORE_SCALE` km scores 1.0.
pub const TOUR_SCORE_SCALE: f64 = 1000.0;

/// Route travelled so far, always starting at the home town.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tour {
    route: Vec<String>,
}

impl Tour {
    /// Cities in visiting order, home town first.
    pub fn route(&self) -> &[String] {
        &self.route
    }

    /// Whether the tour has come back to where it started.
    pub fn is_closed(&self) -> bool {
        self.route.len() > 1 && self.route.first() == self.route.last()
    }

    /// Whether `city` is already on the route.
    pub fn has_visited(&self, city: &str) -> bool {
        self.route.iter().any(|c| c == city)
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route.join(" -> "))
    }
}

/// Traveling tourist rules.
///
/// A move is legal if:
/// 1. No city is visited twice (except for returning home)
/// 2. The city is planned, or it is the home town
/// 3. The home town is chosen only after every planned city was visited
#[derive(Clone, Debug)]
pub struct TravelingTourist {
    home: String,
    planned: Vec<String>,
}

impl TravelingTourist {
    /// Plan a tour from `home` through `cities`.
    ///
    /// The home town may appear in `cities`; it is not counted as a stop.
    ///
    /// # Errors
    /// Returns `MctsError::GameInitiation` if a city is not in the coordinate
    /// table, a city is listed twice, or there is nothing to visit.
    pub fn new(home: &str, cities: &[&str]) -> Result<Self> {
        if coordinates(home).is_none() {
            return Err(MctsError::GameInitiation(format!(
                "unknown home town '{}'",
                home
            )));
        }

        let mut seen = HashSet::new();
        let mut planned = Vec::new();
        for &city in cities {
            if coordinates(city).is_none() {
                return Err(MctsError::GameInitiation(format!("unknown city '{}'", city)));
            }
            if !seen.insert(city) {
                return Err(MctsError::GameInitiation(format!(
                    "city '{}' is listed more than once",
                    city
                )));
            }
            if city != home {
                planned.push(city.to_string());
            }
        }

        if planned.is_empty() {
            return Err(MctsError::GameInitiation(
                "need at least one city besides the home town".to_string(),
            ));
        }

        Ok(Self {
            home: home.to_string(),
            planned,
        })
    }

    /// Home town, where every tour starts and ends.
    pub fn home(&self) -> &str {
        &self.home
    }

    /// Cities to visit, excluding the home town.
    pub fn planned(&self) -> &[String] {
        &self.planned
    }

    /// A tour standing at the home town.
    pub fn initial_state(&self) -> Tour {
        Tour {
            route: vec![self.home.clone()],
        }
    }

    /// Rebuild a tour by playing `stops` (excluding the home start) in order.
    ///
    /// # Errors
    /// Returns `MctsError::IllegalMove` at the first stop the rules reject.
    pub fn tour_through(&self, stops: &[&str]) -> Result<Tour> {
        stops.iter().try_fold(self.initial_state(), |tour, stop| {
            self.apply(&tour, &stop.to_string())
        })
    }

    /// Whether `city` may be visited next.
    pub fn is_legal(&self, tour: &Tour, city: &str) -> bool {
        if tour.is_closed() {
            return false;
        }

        if city == self.home {
            // Only allowed once all other cities have been visited
            self.planned.iter().all(|c| tour.has_visited(c))
        } else {
            self.planned.iter().any(|c| c == city) && !tour.has_visited(city)
        }
    }

    /// Length of the route in kilometres, leg by leg.
    pub fn route_length_km(&self, tour: &Tour) -> f64 {
        tour.route
            .windows(2)
            .filter_map(|leg| distance_km(&leg[0], &leg[1]))
            .sum()
    }
}

impl Game for TravelingTourist {
    type State = Tour;
    type Move = String;

    fn root(&self, _state: &Tour) -> String {
        self.home.clone()
    }

    fn is_terminal(&self, state: &Tour) -> bool {
        state.is_closed()
    }

    fn legal_moves(&self, state: &Tour) -> Vec<String> {
        if state.is_closed() {
            return Vec::new();
        }

        let remaining: Vec<String> = self
            .planned
            .iter()
            .filter(|c| !state.has_visited(c))
            .cloned()
            .collect();

        if remaining.is_empty() {
            vec![self.home.clone()]
        } else {
            remaining
        }
    }

    fn apply(&self, state: &Tour, mv: &String) -> Result<Tour> {
        if !self.is_legal(state, mv) {
            return Err(MctsError::IllegalMove(format!(
                "cannot travel to '{}' from {}",
                mv, state
            )));
        }

        let mut next = state.clone();
        next.route.push(mv.clone());
        Ok(next)
    }

    fn evaluate(&self, state: &Tour) -> Result<f64> {
        if !state.is_closed() {
            return Err(MctsError::NotTerminal);
        }
        Ok(TOUR_SCORE_SCALE / self.route_length_km(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tourist() -> TravelingTourist {
        TravelingTourist::new("Berlin", &["Berlin", "Copenhagen", "Paris", "Lisbon"]).unwrap()
    }

    #[test]
    fn test_check_moves() {
        let game = tourist();
        let tour = game.tour_through(&["Copenhagen"]).unwrap();

        // Copenhagen not allowed because already visited
        assert!(!game.is_legal(&tour, "Copenhagen"));
        // Berlin not allowed because home town and not yet visited all cities
        assert!(!game.is_legal(&tour, "Berlin"));
        // Paris is allowed
        assert!(game.is_legal(&tour, "Paris"));
        // Not planned
        assert!(!game.is_legal(&tour, "Madrid"));
    }

    #[test]
    fn test_home_last() {
        let game = tourist();
        let tour = game.tour_through(&["Paris", "Lisbon", "Copenhagen"]).unwrap();
        assert_eq!(game.legal_moves(&tour), vec!["Berlin".to_string()]);

        let closed = game.apply(&tour, &"Berlin".to_string()).unwrap();
        assert!(game.is_terminal(&closed));
        assert!(game.legal_moves(&closed).is_empty());
        assert_eq!(closed.to_string(), "Berlin -> Paris -> Lisbon -> Copenhagen -> Berlin");
    }

    #[test]
    fn test_illegal_move_rejected() {
        let game = tourist();
        let tour = game.initial_state();
        assert!(matches!(
            game.apply(&tour, &"Berlin".to_string()),
            Err(MctsError::IllegalMove(_))
        ));
        assert!(matches!(
            game.tour_through(&["Paris", "Paris"]),
            Err(MctsError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_evaluate_requires_closed_tour() {
        let game = tourist();
        let open = game.tour_through(&["Paris"]).unwrap();
        assert_eq!(game.evaluate(&open), Err(MctsError::NotTerminal));
    }

    #[test]
    fn test_shorter_tour_scores_higher() {
        let game = TravelingTourist::new("Berlin", &["Hamburg", "Madrid", "Lisbon"]).unwrap();
        let sensible = game
            .tour_through(&["Hamburg", "Madrid", "Lisbon", "Berlin"])
            .unwrap();
        let zigzag = game
            .tour_through(&["Madrid", "Hamburg", "Lisbon", "Berlin"])
            .unwrap();

        let good = game.evaluate(&sensible).unwrap();
        let bad = game.evaluate(&zigzag).unwrap();
        assert!(good > bad, "{} should beat {}", good, bad);

        let expected = TOUR_SCORE_SCALE / game.route_length_km(&sensible);
        assert!((good - expected).abs() < 1e-12);
    }

    #[test]
    fn test_game_initiation_errors() {
        assert!(matches!(
            TravelingTourist::new("Atlantis", &["Paris"]),
            Err(MctsError::GameInitiation(_))
        ));
        assert!(matches!(
            TravelingTourist::new("Berlin", &["Paris", "Gotham"]),
            Err(MctsError::GameInitiation(_))
        ));
        assert!(matches!(
            TravelingTourist::new("Berlin", &["Paris", "Paris"]),
            Err(MctsError::GameInitiation(_))
        ));
        assert!(matches!(
            TravelingTourist::new("Berlin", &["Berlin"]),
            Err(MctsError::GameInitiation(_))
        ));
    }

    #[test]
    fn test_root_is_home() {
        let game = tourist();
        assert_eq!(game.root(&game.initial_state()), "Berlin");
        assert_eq!(game.planned().len(), 3);
    }
}
