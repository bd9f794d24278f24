use clap::Args;
use garden_core as garden;
use garden::{Cell, Coord, Coord2, KeyValueStore, TileColor, TileGenerator};
use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::theme;
use crate::utils::*;

/// How long a played turn stays on screen before input is accepted again.
const TURN_DELAY_MS: u32 = 350;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Empty,
    Tile(TileColor),
    Selected(TileColor),
    Spawned(TileColor),
    Trail,
    Cleared,
}

/// How a cell should look, highlighting the last turn while it is processing.
fn view_cell_state<G: TileGenerator>(
    engine: &garden::PlayEngine<G>,
    coords: Coord2,
) -> ViewCellState {
    use ViewCellState::*;

    let turn = engine
        .state()
        .is_processing()
        .then(|| engine.last_turn())
        .flatten();

    match (engine.cell_at(coords), turn) {
        (Cell::Tile(color), _) if engine.selected() == Some(coords) => Selected(color),
        (Cell::Tile(color), Some(turn)) if turn.spawned().any(|(pos, _)| pos == coords) => {
            Spawned(color)
        }
        (Cell::Tile(color), _) => Tile(color),
        (Cell::Empty, Some(turn)) if turn.cleared().any(|pos| pos == coords) => Cleared,
        (Cell::Empty, Some(turn)) if turn.path().is_some_and(|path| path.contains(&coords)) => {
            Trail
        }
        (Cell::Empty, _) => Empty,
    }
}

/// Ends a processing turn. When that finishes the game the score goes into
/// `prefs`, and whether it set a new record is returned.
fn settle_turn<G, S>(
    engine: &mut garden::PlayEngine<G>,
    prefs: &mut garden::Preferences,
    store: &mut S,
) -> Option<bool>
where
    G: TileGenerator,
    S: KeyValueStore + ?Sized,
{
    if !engine.state().is_processing() {
        return None;
    }
    engine
        .finish_turn()
        .is_finished()
        .then(|| prefs.finish_game(engine.score(), store))
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellClicked(Coord2),
    FinishTurn,
    NewGame,
    ToggleTheme,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: Coord,
    col: Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        col,
        cell_state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Empty => classes!(),
            Tile(color) => classes!("tile", color.name()),
            Selected(color) => classes!("tile", color.name(), "selected"),
            Spawned(color) => classes!("tile", color.name(), "spawned"),
            Trail => classes!("trail"),
            Cleared => classes!("cleared"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) clicked", row, col);
        callback.emit((row, col));
    });

    html! {
        <td {class} {onclick}/>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) struct GameView {
    engine: garden::PlayEngine,
    prefs: garden::Preferences,
    storage: BrowserStorage,
    new_record: bool,
    turn_timeout: Option<Timeout>,
}

impl GameView {
    fn schedule_finish_turn(ctx: &Context<Self>) -> Timeout {
        let link = ctx.link().clone();
        Timeout::new(TURN_DELAY_MS, move || link.send_message(Msg::FinishTurn))
    }

    fn click_cell(&mut self, ctx: &Context<Self>, coords: Coord2) -> bool {
        use garden::SelectOutcome::*;

        match self.engine.select(coords) {
            Ok(Moved) => {
                self.turn_timeout = Some(Self::schedule_finish_turn(ctx));
                true
            }
            Ok(outcome) => {
                log::debug!("select {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Err(err) => {
                log::debug!("select {:?}: {}", coords, err);
                false
            }
        }
    }

    fn finish_turn(&mut self) -> bool {
        self.turn_timeout = None;
        let settled = settle_turn(&mut self.engine, &mut self.prefs, &mut self.storage);
        if let Some(new_record) = settled {
            self.new_record = new_record;
            log::info!(
                "game over, score {} (best {})",
                self.engine.score(),
                self.prefs.high_score.0
            );
        }
        true
    }

    fn get_state_class(&self) -> &'static str {
        use garden::EngineState::*;
        match self.engine.state() {
            Idle => "idle",
            TileSelected(_) => "selecting",
            Processing => "processing",
            GameOver => "game-over",
        }
    }

    fn view_upcoming(&self) -> Html {
        html! {
            <span class="upcoming">
                {
                    for self.engine.upcoming().iter().map(|color| html! {
                        <i class={classes!("tile", color.name())}/>
                    })
                }
            </span>
        }
    }

    fn view_game_over(&self, ctx: &Context<Self>) -> Html {
        if !self.engine.is_finished() {
            return html! {};
        }

        let cb_play_again = ctx.link().callback(|_: MouseEvent| Msg::NewGame);
        let record = if self.new_record {
            html! { <p class="record">{"New high score!"}</p> }
        } else {
            html! {}
        };

        html! {
            <dialog id="game-over" open={true}>
                <article>
                    <h2>{"The garden is full"}</h2>
                    <p>{format!("Score: {}", self.engine.score())}</p>
                    {record}
                    <footer>
                        <button onclick={cb_play_again}>{"Play again"}</button>
                    </footer>
                </article>
            </dialog>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        let storage = BrowserStorage;
        Self {
            engine: garden::PlayEngine::with_seed(garden::GameConfig::default(), seed),
            prefs: garden::Preferences::load(&storage),
            storage,
            new_record: false,
            turn_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellClicked(coords) => self.click_cell(ctx, coords),
            FinishTurn => self.finish_turn(),
            NewGame => {
                // the turn on screen may have been the last one
                self.finish_turn();
                self.new_record = false;
                self.engine.reset();
                true
            }
            ToggleTheme => {
                self.prefs.theme = self.prefs.theme.toggled();
                theme::apply(self.prefs.theme);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let (rows, cols) = self.engine.size();
        let accepts_input = self.engine.state().accepts_input();
        let score = self.engine.score().to_string();
        let high_score = self.prefs.high_score.0.max(self.engine.score()).to_string();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_toggle_theme = ctx.link().callback(|_: MouseEvent| ToggleTheme);

        html! {
            <div class={classes!("garden", self.get_state_class())}>
                <small onclick={cb_toggle_theme}>{self.prefs.theme.toggled().scheme()}</small>
                <nav>
                    <aside class="score">{score}</aside>
                    {self.view_upcoming()}
                    <aside class="high-score">{high_score}</aside>
                </nav>
                <table class={classes!(accepts_input.then_some("playable"))}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let coords = (row, col);
                                        let cell_state = view_cell_state(&self.engine, coords);
                                        let locked = !self.engine.can_select(coords);
                                        let callback = ctx.link().callback(CellClicked);
                                        html! {
                                            <CellView {row} {col} {cell_state} {locked} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <button class="new-game" onclick={cb_new_game}>{"New game"}</button>
                {self.view_game_over(ctx)}
            </div>
        }
    }
}
