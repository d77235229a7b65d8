use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;

use anyhow::{Context, Result, anyhow, bail, ensure};
use pharma_game::board::{SPACES, phase_for_space};
use pharma_game::path::{FUNDING_ROUND_DEFS, event_pool};
use pharma_game::{
    BoardSession, Difficulty, GameAction, GameEngine, GameStatus, GameStorage, PathAction,
    PathStatus, SavedGame, TurnOutcome, calculate_funding_terms, create_initial_state,
    game_reducer, get_random_event, meets_gate_requirements, path_game_reducer,
    should_trigger_funding,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary, SimulationTarget};

const EPS: f64 = 1e-9;

/// Single-shot engine checks. These never play a campaign; the summary only
/// carries the seed and the untouched starting state.
pub fn catalog_plan(key: &str) -> Option<SimulationPlan> {
    let plan = match key {
        "bankruptcy-rescue" => base_plan(SimulationTarget::Board(Difficulty::Blockbuster))
            .with_expectation(bankruptcy_rescue_expectation),
        "gate-enforcement" => base_plan(SimulationTarget::Board(Difficulty::Specialty))
            .with_expectation(gate_enforcement_expectation),
        "runway-defeat" => base_plan(SimulationTarget::Path("orphan-small-molecule"))
            .with_expectation(runway_defeat_expectation),
        "funding-terms" => base_plan(SimulationTarget::Path("orphan-biologic"))
            .with_expectation(funding_terms_expectation),
        "event-recycling" => base_plan(SimulationTarget::Path("blockbuster-biologic"))
            .with_expectation(event_recycling_expectation),
        "saved-games" => base_plan(SimulationTarget::Board(Difficulty::Orphan))
            .with_expectation(saved_games_expectation),
        _ => return None,
    };
    Some(plan)
}

fn base_plan(target: SimulationTarget) -> SimulationPlan {
    SimulationPlan::new(target, GameplayStrategy::Balanced).with_max_steps(0)
}

fn bankruptcy_rescue_expectation(_summary: &SimulationSummary) -> Result<()> {
    let broke = game_reducer(
        create_initial_state(Difficulty::Blockbuster),
        GameAction::PayCost { amount: 150.0 },
    );
    ensure!(broke.capital.abs() < EPS, "Capital should clamp to 0");
    ensure!(broke.status == GameStatus::Lost, "Bankruptcy should set lost");
    let decision = broke
        .pending
        .decision()
        .context("Bankruptcy should open a rescue decision")?;
    let ids: Vec<&str> = decision.options.iter().map(|o| o.id.as_str()).collect();
    ensure!(
        ids == ["emergency-financing", "asset-sale", "shutdown"],
        "Unexpected rescue options {ids:?}"
    );

    let financed = resolve(&broke, "emergency-financing");
    ensure!(financed.status == GameStatus::Playing, "Financing should resume play");
    ensure!((financed.capital - 40.0).abs() < EPS, "Financing raises $40M");
    ensure!(
        (financed.founder_ownership - 0.5).abs() < EPS,
        "Financing sells half the company"
    );

    let sold = resolve(&broke, "asset-sale");
    ensure!(sold.status == GameStatus::Playing, "Asset sale should resume play");
    ensure!((sold.capital - 25.0).abs() < EPS, "Asset sale raises $25M");

    let closed = resolve(&broke, "shutdown");
    ensure!(closed.status == GameStatus::Lost, "Shutdown keeps the game lost");
    ensure!(closed.pending.is_none(), "Shutdown closes the decision");
    Ok(())
}

fn resolve(state: &pharma_game::GameState, option_id: &str) -> pharma_game::GameState {
    game_reducer(
        state.clone(),
        GameAction::ResolveDecision {
            option_id: option_id.to_string(),
        },
    )
}

fn gate_enforcement_expectation(summary: &SimulationSummary) -> Result<()> {
    let space = SPACES
        .iter()
        .find(|space| space.gate_requirement.is_some_and(|req| !req.is_empty()))
        .context("Board has no gated space")?;
    let requirement = space.gate_requirement.unwrap_or_default();
    ensure!(
        meets_gate_requirements(&requirement, &requirement),
        "A requirement should satisfy itself"
    );

    let mut state = create_initial_state(Difficulty::Specialty);
    state.current_space = space.id;
    state.phase = phase_for_space(space.id);
    let mut session = BoardSession::from_state(state, summary.seed);
    let report = session.play_turn();
    let TurnOutcome::GateBlocked {
        space_id,
        deficit,
        returned_to,
    } = report.outcome
    else {
        bail!("Empty-handed attempt at gate {} gave {:?}", space.id, report.outcome);
    };
    ensure!(space_id == space.id, "Gate reported the wrong space");
    ensure!(deficit == requirement, "Deficit should be the full requirement");
    let landed = returned_to.unwrap_or(space.id);
    ensure!(landed <= space.id, "Gate failure moved the token forward");
    ensure!(
        session.state().current_space == landed,
        "Token sits on {} instead of {landed}",
        session.state().current_space
    );
    Ok(())
}

fn runway_defeat_expectation(summary: &SimulationSummary) -> Result<()> {
    let start = summary
        .path()
        .context("Runway check needs a path state")?
        .clone();
    ensure!((start.capital - 80.0).abs() < EPS, "Orphan small molecule starts at $80M");
    ensure!(
        should_trigger_funding(&start).is_none(),
        "Funding should wait while runway is long"
    );

    let short = path_game_reducer(start.clone(), PathAction::AdvanceTime { quarters: 13 });
    ensure!(short.status == PathStatus::Playing, "Still solvent after 13 quarters");
    ensure!(
        should_trigger_funding(&short) == Some("seed"),
        "Seed round should trigger below a year of runway"
    );

    let dry = path_game_reducer(start, PathAction::AdvanceTime { quarters: 20 });
    ensure!(dry.status == PathStatus::Defeat, "Twenty quarters should exhaust $80M");
    ensure!(dry.capital.abs() < EPS, "Defeat clamps capital to 0");
    Ok(())
}

fn funding_terms_expectation(_summary: &SimulationSummary) -> Result<()> {
    let seed = calculate_funding_terms("seed", 80).context("seed round missing")?;
    ensure!(
        (seed.confidence_multiplier - 1.18).abs() < EPS,
        "multiplier {}",
        seed.confidence_multiplier
    );
    ensure!((seed.raise - 12.0).abs() < EPS, "raise {}", seed.raise);
    ensure!((seed.dilution - 0.164).abs() < EPS, "dilution {}", seed.dilution);
    ensure!(
        calculate_funding_terms("series-z", 50).is_none(),
        "Unknown rounds have no terms"
    );

    for def in &FUNDING_ROUND_DEFS {
        let shaky = calculate_funding_terms(def.id, 10)
            .ok_or_else(|| anyhow!("no terms for {}", def.id))?;
        let hot = calculate_funding_terms(def.id, 95)
            .ok_or_else(|| anyhow!("no terms for {}", def.id))?;
        ensure!(hot.raise >= shaky.raise, "{}: confidence lowered the raise", def.id);
        ensure!(hot.dilution <= shaky.dilution, "{}: confidence raised dilution", def.id);
        ensure!(
            (0.0..1.0).contains(&shaky.dilution) && shaky.raise > 0.0,
            "{}: terms out of range",
            def.id
        );
    }
    Ok(())
}

fn event_recycling_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut state = summary
        .path()
        .context("Event check needs a path state")?
        .clone();
    state.capital = 1_000_000.0;
    let path_id = state.path_id.clone();
    let pool: HashSet<String> = event_pool()
        .pool_for(path_id.as_deref(), state.current_phase)
        .iter()
        .map(|event| event.id.clone())
        .collect();
    ensure!(!pool.is_empty(), "No events for the opening phase");

    let mut rng = ChaCha20Rng::seed_from_u64(summary.seed);
    let mut drawn = Vec::new();
    for _ in 0..=pool.len() {
        let event = get_random_event(&state, &mut rng).context("Event pool ran dry")?;
        let choice_id = event
            .choices
            .first()
            .map(|choice| choice.id.clone())
            .context("Event without choices")?;
        drawn.push(event.id.clone());
        state = path_game_reducer(state, PathAction::ResolveEvent { choice_id, event });
    }

    let (first, extra) = drawn.split_at(pool.len());
    let unique: HashSet<String> = first.iter().cloned().collect();
    ensure!(unique == pool, "Events repeated before the pool was used up");
    ensure!(
        extra.iter().all(|id| id.contains('#') && !pool.contains(id)),
        "Recycled events should carry a fresh id: {extra:?}"
    );
    Ok(())
}

/// Save slots held as JSON text, the way a browser's local storage would.
#[derive(Default)]
struct JsonSlots {
    slots: RefCell<HashMap<String, String>>,
}

impl GameStorage for JsonSlots {
    type Error = serde_json::Error;

    fn save_game(&self, save_name: &str, game: &SavedGame) -> Result<(), Self::Error> {
        let text = serde_json::to_string(game)?;
        self.slots.borrow_mut().insert(save_name.to_string(), text);
        Ok(())
    }

    fn load_game(&self, save_name: &str) -> Result<Option<SavedGame>, Self::Error> {
        self.slots
            .borrow()
            .get(save_name)
            .map(|text| serde_json::from_str(text))
            .transpose()
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        self.slots.borrow_mut().remove(save_name);
        Ok(())
    }
}

fn saved_games_expectation(summary: &SimulationSummary) -> Result<()> {
    let engine = GameEngine::new(JsonSlots::default());

    let mut board = engine.create_board_session(Difficulty::Orphan, summary.seed);
    for _ in 0..6 {
        board.play_turn();
    }
    engine.save_board("board", board.state())?;
    let restored = engine
        .load_board("board", summary.seed)?
        .context("board save vanished")?;
    ensure!(restored.state() == board.state(), "Board save did not roundtrip");

    let mut path = engine.create_path_session(summary.seed);
    path.dispatch(PathAction::SelectPath {
        path_id: "orphan-gene-therapy".to_string(),
    });
    for _ in 0..6 {
        path.play_quarter();
    }
    engine.save_path("path", path.state())?;
    let restored = engine
        .load_path("path", summary.seed)?
        .context("path save vanished")?;
    ensure!(restored.state() == path.state(), "Path save did not roundtrip");

    ensure!(
        engine.load_board("path", summary.seed).is_err(),
        "Loading a path save as a board game should fail"
    );
    engine.delete_save("board")?;
    ensure!(
        engine.load_board("board", summary.seed)?.is_none(),
        "Deleted save still loads"
    );
    Ok(())
}
