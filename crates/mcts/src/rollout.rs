//! Rollout policies and random play-outs.
//!
//! A `RolloutPolicy` picks one move among the legal ones. The engine uses it
//! twice per iteration: to choose which freshly expanded child to follow, and
//! for every move of the play-out that produces the iteration's evaluation.
//!
//! - [`UniformRollout`]: uniform random choice (default)
//! - [`ScriptedRollout`]: replays a fixed sequence of choices, for
//!   reproducing a search without randomness in the play-outs

use montecarlo_core::{Game, MctsError, Result};
use rand::Rng;

/// Strategy choosing the next move during expansion and simulation.
pub trait RolloutPolicy<M> {
    /// Return the index in `moves` of the move to play.
    ///
    /// `moves` is never empty.
    fn choose<R: Rng + ?Sized>(&mut self, moves: &[M], rng: &mut R) -> usize;
}

/// Uniform random choice among legal moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformRollout;

impl<M> RolloutPolicy<M> for UniformRollout {
    fn choose<R: Rng + ?Sized>(&mut self, moves: &[M], rng: &mut R) -> usize {
        rng.gen_range(0..moves.len())
    }
}

/// Deterministic policy replaying a recorded sequence of choice indices.
///
/// Each index is reduced modulo the number of legal moves. Once the script
/// is exhausted it starts over from the beginning; an empty script always
/// picks the first move.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRollout {
    script: Vec<usize>,
    position: usize,
}

impl ScriptedRollout {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            position: 0,
        }
    }

    /// Number of choices made so far.
    pub fn choices_made(&self) -> usize {
        self.position
    }
}

impl<M> RolloutPolicy<M> for ScriptedRollout {
    fn choose<R: Rng + ?Sized>(&mut self, moves: &[M], _rng: &mut R) -> usize {
        let choice = if self.script.is_empty() {
            0
        } else {
            self.script[self.position % self.script.len()]
        };
        self.position += 1;
        choice % moves.len()
    }
}

/// Pick a move from `moves` with `policy`.
///
/// # Errors
/// Returns `MctsError::NoLegalMoves` if `moves` is empty and
/// `MctsError::InvalidPolicy` if the policy returns an out-of-range index.
pub fn choose_move<M, P, R>(moves: &[M], policy: &mut P, rng: &mut R) -> Result<M>
where
    M: Clone,
    P: RolloutPolicy<M>,
    R: Rng + ?Sized,
{
    if moves.is_empty() {
        return Err(MctsError::NoLegalMoves);
    }

    let idx = policy.choose(moves, rng);
    moves.get(idx).cloned().ok_or_else(|| {
        MctsError::InvalidPolicy(format!(
            "rollout chose index {} among {} moves",
            idx,
            moves.len()
        ))
    })
}

/// Play from `state` until the game ends and return its evaluation.
///
/// Works on its own copy of the state; nothing played here is recorded in
/// the tree.
///
/// # Errors
/// Returns `MctsError::NoLegalMoves` if a non-terminal state offers no move,
/// and propagates any error from the game itself.
pub fn play_out<G, P, R>(game: &G, state: &G::State, policy: &mut P, rng: &mut R) -> Result<f64>
where
    G: Game,
    P: RolloutPolicy<G::Move>,
    R: Rng + ?Sized,
{
    let mut state = state.clone();

    while !game.is_terminal(&state) {
        let moves = game.legal_moves(&state);
        let mv = choose_move(&moves, policy, rng)?;
        state = game.apply(&state, &mv)?;
    }

    game.evaluate(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // Add 1 or 2 until the total reaches at least 5; the evaluation is the total
    #[derive(Clone)]
    struct CountingGame;

    impl Game for CountingGame {
        type State = u8;
        type Move = u8;

        fn root(&self, _state: &u8) -> u8 {
            0
        }

        fn is_terminal(&self, state: &u8) -> bool {
            *state >= 5
        }

        fn legal_moves(&self, state: &u8) -> Vec<u8> {
            if *state >= 5 {
                Vec::new()
            } else {
                vec![1, 2]
            }
        }

        fn apply(&self, state: &u8, mv: &u8) -> Result<u8> {
            if self.is_terminal(state) || !(1..=2).contains(mv) {
                return Err(MctsError::IllegalMove(format!("{:?}", mv)));
            }
            Ok(state + mv)
        }

        fn evaluate(&self, state: &u8) -> Result<f64> {
            if self.is_terminal(state) {
                Ok(*state as f64)
            } else {
                Err(MctsError::NotTerminal)
            }
        }
    }

    // Claims to go on forever but offers no move
    #[derive(Clone)]
    struct StuckGame;

    impl Game for StuckGame {
        type State = ();
        type Move = u8;

        fn root(&self, _state: &()) -> u8 {
            0
        }

        fn is_terminal(&self, _state: &()) -> bool {
            false
        }

        fn legal_moves(&self, _state: &()) -> Vec<u8> {
            Vec::new()
        }

        fn apply(&self, _state: &(), mv: &u8) -> Result<()> {
            Err(MctsError::IllegalMove(format!("{:?}", mv)))
        }

        fn evaluate(&self, _state: &()) -> Result<f64> {
            Err(MctsError::NotTerminal)
        }
    }

    #[test]
    fn test_uniform_rollout_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let moves = ["a", "b", "c"];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let idx = UniformRollout.choose(&moves, &mut rng);
            assert!(idx < moves.len());
            seen[idx] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_scripted_rollout_replays() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut policy = ScriptedRollout::new(vec![1, 0, 5]);
        let moves = [10, 20, 30];
        let picks: Vec<usize> = (0..4).map(|_| policy.choose(&moves, &mut rng)).collect();
        assert_eq!(picks, vec![1, 0, 2, 1]);
        assert_eq!(policy.choices_made(), 4);
    }

    #[test]
    fn test_empty_script_picks_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut policy = ScriptedRollout::default();
        assert_eq!(policy.choose(&[7, 8], &mut rng), 0);
    }

    #[test]
    fn test_play_out_reaches_terminal() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let value = play_out(&CountingGame, &0, &mut UniformRollout, &mut rng).unwrap();
            assert!(value == 5.0 || value == 6.0);
        }
    }

    #[test]
    fn test_play_out_scripted() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // 2 + 2 + 2 = 6
        let mut always_two = ScriptedRollout::new(vec![1]);
        assert_eq!(play_out(&CountingGame, &0, &mut always_two, &mut rng), Ok(6.0));
        // 1 + 1 + 1 + 1 + 1 = 5
        let mut always_one = ScriptedRollout::new(vec![0]);
        assert_eq!(play_out(&CountingGame, &0, &mut always_one, &mut rng), Ok(5.0));
    }

    #[test]
    fn test_play_out_from_terminal_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(play_out(&CountingGame, &5, &mut UniformRollout, &mut rng), Ok(5.0));
    }

    #[test]
    fn test_play_out_surfaces_missing_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            play_out(&StuckGame, &(), &mut UniformRollout, &mut rng),
            Err(MctsError::NoLegalMoves)
        );
    }

    #[test]
    fn test_choose_move_rejects_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let moves: [u8; 0] = [];
        assert_eq!(
            choose_move(&moves, &mut UniformRollout, &mut rng),
            Err(MctsError::NoLegalMoves)
        );
    }
}
