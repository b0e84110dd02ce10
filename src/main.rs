//! Memory Match entry point
//!
//! Handles platform-specific initialization and wires DOM events into the
//! session controller.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use memory_match::audio::{AudioManager, SoundEffect};
    use memory_match::consts::TICK_INTERVAL_MS;
    use memory_match::persistence::LocalStorage;
    use memory_match::sim::{GameEvent, Generation};
    use memory_match::view::{SummaryView, board_view};
    use memory_match::{KeyValueStore, MemoryStore, Session, StorageError, platform};

    /// LocalStorage, or memory when the browser refuses it (private mode etc.)
    enum Store {
        Local(LocalStorage),
        Memory(MemoryStore),
    }

    impl KeyValueStore for Store {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match self {
                Store::Local(s) => s.get(key),
                Store::Memory(s) => s.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                Store::Local(s) => s.set(key, value),
                Store::Memory(s) => s.set(key, value),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<Store>,
        audio: AudioManager,
        document: Document,
        /// Running tick interval handle and its callback
        timer: Option<(i32, Closure<dyn FnMut()>)>,
    }

    impl Game {
        fn stop_timer(&mut self) {
            if let Some((handle, _closure)) = self.timer.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }

        fn render(&self) {
            self.render_board();
            self.render_summary();
            self.render_notice();
        }

        /// Rebuild the card grid (clicks are delegated, so no listeners here)
        fn render_board(&self) {
            let Some(board) = self.document.get_element_by_id("board") else {
                return;
            };
            let html: String = board_view(self.session.state())
                .iter()
                .map(|card| {
                    format!(
                        r#"<div class="{}" data-id="{}"><div class="card-inner">{}</div></div>"#,
                        card.class_name(),
                        card.id,
                        card.label()
                    )
                })
                .collect();
            board.set_inner_html(&html);

            let class = if self.session.settings().reduced_motion {
                "game-board no-motion"
            } else {
                "game-board"
            };
            let _ = board.set_attribute("class", class);
        }

        /// Update HUD and leaderboard panel
        fn render_summary(&self) {
            let summary = SummaryView::from_session(&self.session);

            for (id, text) in [
                ("moves", &summary.moves),
                ("time", &summary.time),
                ("best", &summary.best),
            ] {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            }

            if let Some(list) = self.document.get_element_by_id("leaderboard") {
                let html: String = summary
                    .leaderboard
                    .iter()
                    .map(|line| format!("<li>{}</li>", line))
                    .collect();
                list.set_inner_html(&html);
            }
        }

        /// Show/hide the completion dialog
        fn render_notice(&self) {
            let Some(dialog) = self.document.get_element_by_id("completion") else {
                return;
            };
            match self.session.notice() {
                Some(notice) => {
                    let _ = dialog.set_attribute("class", "modal");
                    if let Some(el) = self.document.get_element_by_id("completion-text") {
                        el.set_text_content(Some(&notice.message()));
                    }
                    if let Some(el) = self.document.get_element_by_id("new-best") {
                        let class = if notice.new_best { "" } else { "hidden" };
                        let _ = el.set_attribute("class", class);
                    }
                }
                None => {
                    let _ = dialog.set_attribute("class", "modal hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Memory Match starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let store = match LocalStorage::open() {
            Ok(storage) => Store::Local(storage),
            Err(e) => {
                log::warn!("{} - scores will not persist", e);
                Store::Memory(MemoryStore::new())
            }
        };

        let seed = platform::seed();
        let session = Session::new(store, seed);
        log::info!("Session started with seed: {}", seed);

        let audio = AudioManager::new(session.settings());
        let game = Rc::new(RefCell::new(Game {
            session,
            audio,
            document: document.clone(),
            timer: None,
        }));

        setup_board_clicks(&document, game.clone());
        setup_buttons(&document, game.clone());

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        game.borrow().render();
        start_timer(&game);

        log::info!("Memory Match running!");
    }

    /// Start the one-second clock for the current deal
    fn start_timer(game: &Rc<RefCell<Game>>) {
        let generation = {
            let mut g = game.borrow_mut();
            g.stop_timer();
            if !g.session.state().active {
                return;
            }
            g.session.generation()
        };

        let tick_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = tick_game.borrow_mut();
            if g.session.tick(generation) {
                g.render_summary();
            }
        });

        let Some(window) = web_sys::window() else {
            return;
        };
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS as i32,
        ) {
            Ok(handle) => game.borrow_mut().timer = Some((handle, closure)),
            Err(e) => log::error!("Failed to start timer: {:?}", e),
        }
    }

    /// Hide a mismatched pair after the delay, unless the deal was replaced
    fn schedule_mismatch_reset(game: Rc<RefCell<Game>>, generation: Generation, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let mut g = game.borrow_mut();
            if g.session.resolve_mismatch(generation) {
                g.render_board();
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        );
    }

    fn select_card(game: &Rc<RefCell<Game>>, id: u32) {
        let mut g = game.borrow_mut();
        let events = g.session.select_card(id);
        if events.is_empty() {
            return;
        }

        let mut pending_reset = None;
        for event in &events {
            let mut effect = SoundEffect::for_event(event);
            match event {
                GameEvent::PairMismatched { generation, .. } => pending_reset = Some(*generation),
                GameEvent::Won { .. } => {
                    g.stop_timer();
                    if g.session.notice().is_some_and(|n| n.new_best) {
                        effect = SoundEffect::NewBest;
                    }
                }
                _ => {}
            }
            g.audio.play(effect);
        }

        g.render();
        let delay_ms = g.session.mismatch_delay_ms();
        drop(g);

        if let Some(generation) = pending_reset {
            schedule_mismatch_reset(game.clone(), generation, delay_ms);
        }
    }

    fn restart(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.session.deal_new_game();
            g.render();
        }
        start_timer(game);
    }

    fn setup_board_clicks(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(board) = document.get_element_by_id("board") else {
            log::error!("No #board element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Ok(Some(card)) = target.closest(".card") else {
                return;
            };
            if let Some(id) = card
                .get_attribute("data-id")
                .and_then(|s| s.parse::<u32>().ok())
            {
                select_card(&game, id);
            }
        });
        let _ = board.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Restart and play-again both deal a fresh board
        for id in ["restart-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    restart(&game);
                    log::info!("Game restarted");
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("close-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.close_notice();
                g.render_notice();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use memory_match::view::SummaryView;
    use memory_match::{MemoryStore, Session, platform};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(platform::seed);
    log::info!("Memory Match (native) starting with seed {}", seed);
    log::info!("Run with `trunk serve` for the playable web version");

    let mut session = Session::new(MemoryStore::new(), seed);
    autoplay(&mut session);

    let summary = SummaryView::from_session(&session);
    if let Some(notice) = session.notice() {
        println!("{}", notice.message());
    }
    println!("{}", summary.best);
    for line in &summary.leaderboard {
        println!("  {}", line);
    }
}

/// Play the current deal with a perfect memory of every card seen
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(session: &mut memory_match::Session<memory_match::MemoryStore>) {
    use std::collections::HashMap;

    // value -> seen, unmatched card ids
    let mut memory: HashMap<u32, Vec<u32>> = HashMap::new();
    let mut next_unseen = 0u32;

    while !session.state().is_won() {
        let generation = session.generation();
        session.tick(generation);

        // Both halves of a pair already seen
        let known = memory
            .iter()
            .find(|(_, ids)| ids.len() == 2)
            .map(|(&value, ids)| (value, ids[0], ids[1]));
        if let Some((value, a, b)) = known {
            session.select_card(a);
            session.select_card(b);
            memory.remove(&value);
            continue;
        }

        let first = next_unseen;
        next_unseen += 1;
        let value = session.state().deck[first as usize].value;
        session.select_card(first);

        if let Some(partner) = memory.remove(&value).and_then(|ids| ids.first().copied()) {
            session.select_card(partner);
            continue;
        }

        let second = next_unseen;
        next_unseen += 1;
        let second_value = session.state().deck[second as usize].value;
        session.select_card(second);

        if second_value != value {
            memory.entry(value).or_default().push(first);
            memory.entry(second_value).or_default().push(second);
            session.resolve_mismatch(generation);
            log::debug!("Mismatch {} / {}", first, second);
        }
    }
}
