//! Store/URL synchronization driven through `handle_event`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use storefront_filters::app::{ChangeOrigin, SyncPhase};
use storefront_filters::domain::{ActiveFilter, Category, SortOption};
use storefront_filters::query::QueryString;
use storefront_filters::{handle_event, Action, AppState, Catalog, Event};

fn session(delay_ms: u64) -> (AppState, Rc<RefCell<Vec<ChangeOrigin>>>) {
    let mut state = AppState::new(Catalog::default(), Vec::new(), Duration::from_millis(delay_ms));
    let origins = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&origins);
    state
        .store
        .subscribe(Box::new(move |_, origin| seen.borrow_mut().push(origin)));
    (state, origins)
}

fn brand(value: &str) -> Event {
    Event::Add(ActiveFilter::checkbox(Category::Brand, value, value))
}

fn navigate(raw: &str) -> Event {
    Event::UrlChanged(QueryString::new(raw))
}

fn write(raw: &str) -> Action {
    Action::ReplaceUrl(QueryString::new(raw))
}

#[test]
fn own_write_echo_is_ignored() {
    let (mut state, origins) = session(0);

    assert_eq!(handle_event(&mut state, &brand("Cola")), (true, vec![write("brand=Cola")]));
    assert_eq!(handle_event(&mut state, &navigate("?brand=Cola")), (false, vec![]));

    assert_eq!(*origins.borrow(), vec![ChangeOrigin::User]);
    assert_eq!(state.sync.phase(), &SyncPhase::Idle);
}

#[test]
fn navigation_is_applied_once_without_writing_back() {
    let (mut state, origins) = session(0);

    let (render, actions) = handle_event(&mut state, &navigate("sort=newest&brand=Fanta"));
    assert!(render);
    assert!(actions.is_empty());
    assert!(state.store.is_active("brand-fanta"));
    assert_eq!(state.store.state().sort, SortOption::Newest);

    // The same URL reported again changes nothing.
    assert_eq!(handle_event(&mut state, &navigate("brand=Fanta&sort=newest")), (false, vec![]));

    assert_eq!(*origins.borrow(), vec![ChangeOrigin::Url]);
    assert_eq!(state.sync.phase(), &SyncPhase::Idle);
}

#[test]
fn edit_back_edit_does_not_ping_pong() {
    let (mut state, origins) = session(0);

    assert_eq!(handle_event(&mut state, &brand("Cola")).1, vec![write("brand=Cola")]);
    handle_event(&mut state, &navigate("brand=Cola"));

    // Back button.
    let (render, actions) = handle_event(&mut state, &navigate(""));
    assert!(render);
    assert!(actions.is_empty());
    assert_eq!(state.store.total_active_count(), 0);

    assert_eq!(handle_event(&mut state, &brand("Fanta")).1, vec![write("brand=Fanta")]);
    assert_eq!(handle_event(&mut state, &navigate("brand=Fanta")), (false, vec![]));

    assert_eq!(
        *origins.borrow(),
        vec![ChangeOrigin::User, ChangeOrigin::Url, ChangeOrigin::User]
    );
}

#[test]
fn navigation_wins_over_a_pending_write() {
    let (mut state, _) = session(0);

    assert_eq!(handle_event(&mut state, &brand("Cola")).1, vec![write("brand=Cola")]);

    // Navigation lands before the echo of our write.
    let (render, actions) = handle_event(&mut state, &navigate("brand=Sprite"));
    assert!(render);
    assert!(actions.is_empty());
    assert!(state.store.is_active("brand-sprite"));
    assert!(!state.store.is_active("brand-cola"));

    // The next gesture writes against the navigated URL.
    assert_eq!(
        handle_event(&mut state, &Event::SetSort(SortOption::PriceLow)).1,
        vec![write("brand=Sprite&sort=price-low")]
    );
}

#[test]
fn echoes_arriving_after_a_second_gesture_are_not_navigation() {
    let (mut state, origins) = session(0);

    assert_eq!(handle_event(&mut state, &brand("Cola")).1, vec![write("brand=Cola")]);
    assert_eq!(
        handle_event(&mut state, &Event::SetSort(SortOption::Newest)).1,
        vec![write("brand=Cola&sort=newest")]
    );

    // Both echoes arrive late, oldest first.
    assert_eq!(handle_event(&mut state, &navigate("brand=Cola")), (false, vec![]));
    assert_eq!(handle_event(&mut state, &navigate("brand=Cola&sort=newest")), (false, vec![]));

    assert_eq!(state.store.state().sort, SortOption::Newest);
    assert!(state.store.is_active("brand-cola"));
    assert_eq!(*origins.borrow(), vec![ChangeOrigin::User, ChangeOrigin::User]);
    assert_eq!(state.sync.phase(), &SyncPhase::Idle);
}

#[test]
fn slider_burst_writes_once_after_quiet_period() {
    let (mut state, _) = session(150);
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);
    let slide = |max: f64, ms: u64| Event::SetRange {
        id: "price-range".to_string(),
        min: 5.0,
        max,
        at: at(ms),
    };

    assert_eq!(
        handle_event(&mut state, &slide(30.0, 0)),
        (true, vec![Action::ScheduleTick(Duration::from_millis(150))])
    );
    assert_eq!(
        handle_event(&mut state, &slide(20.0, 60)).1,
        vec![Action::ScheduleTick(Duration::from_millis(150))]
    );

    // First tick fires early relative to the latest movement.
    assert_eq!(
        handle_event(&mut state, &Event::Tick(at(150))),
        (false, vec![Action::ScheduleTick(Duration::from_millis(60))])
    );
    assert_eq!(handle_event(&mut state, &Event::Tick(at(210))), (false, vec![write("price=5-20")]));
    assert_eq!(handle_event(&mut state, &Event::Tick(at(400))), (false, vec![]));
}

#[test]
fn evaluation_follows_every_slider_step() {
    let (mut state, _) = session(150);
    let products = serde_json::from_str(
        r#"[
            {"id": "1", "name": "Sprite", "price": 1.2, "type": "Soda", "size": "0.33L", "brand": "Sprite", "inStock": true},
            {"id": "2", "name": "Fever-Tree Tonic", "price": 9.5, "type": "Mixer", "size": "0.5L", "brand": "Fever-Tree", "inStock": true}
        ]"#,
    )
    .unwrap();
    handle_event(&mut state, &Event::ProductsLoaded(products));
    assert_eq!(state.evaluation.match_count, 2);

    handle_event(
        &mut state,
        &Event::SetRange {
            id: "price-range".to_string(),
            min: 0.0,
            max: 5.0,
            at: Instant::now(),
        },
    );
    assert_eq!(state.evaluation.match_count, 1);
    assert!(state.debounce.is_pending());
}
