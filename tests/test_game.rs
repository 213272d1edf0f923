use snake_q_learning::{Cell, Dir, Game, GameConfig, GameError, Pos};

fn board(seed: u64) -> Game {
    Game::with_seed(&GameConfig::default(), seed).unwrap()
}

#[test]
fn test_walking_right_from_center_ends_on_the_call_after_leaving() {
    let mut game = board(1);
    game.set_food(Pos::new(0, 0)).unwrap();
    assert_eq!(game.snake(), Pos::new(10, 10));

    for step in 1..=10 {
        game.take_action(Dir::Right).unwrap();
        assert!(!game.is_over(), "over too early at step {step}");
    }
    // column 20 is already off the 20x20 board, but the check is pre-move
    assert_eq!(game.snake(), Pos::new(10, 20));
    assert!(!game.in_bounds(game.snake()));

    game.take_action(Dir::Right).unwrap();
    assert!(game.is_over());
}

#[test]
fn test_no_mutation_after_game_over() {
    let mut game = board(2);
    game.set_food(Pos::new(0, 0)).unwrap();
    for _ in 0..11 {
        game.take_action(Dir::Right).unwrap();
    }
    assert!(game.is_over());
    let (pos, dir, score) = (game.snake(), game.dir(), game.score());
    game.take_action(Dir::Up).unwrap();
    game.take_action(Dir::Left).unwrap();
    assert_eq!((game.snake(), game.dir(), game.score()), (pos, dir, score));
}

#[test]
fn test_eating_food_scores_and_relocates() {
    let mut game = board(3);
    game.set_food(Pos::new(10, 15)).unwrap();

    for _ in 0..4 {
        assert!(!game.take_action(Dir::Right).unwrap());
    }
    assert_eq!(game.score(), 0);
    assert!(game.take_action(Dir::Right).unwrap());

    assert_eq!(game.snake(), Pos::new(10, 15));
    assert_eq!(game.score(), 1);
    assert_ne!(game.food(), Pos::new(10, 15));
    assert!(game.in_bounds(game.food()));
    assert_eq!(game.cell(Pos::new(10, 15)), Some(Cell::Snake));
    assert_eq!(game.cell(Pos::new(10, 14)), Some(Cell::Empty));
}

#[test]
fn test_food_never_lands_on_snake() {
    let mut game = board(4);
    for _ in 0..2000 {
        let food = game.generate_food().unwrap();
        assert_ne!(food, game.snake());
        assert!(game.in_bounds(food));
    }
}

#[test]
fn test_reset_restores_start() {
    let mut game = board(5);
    game.set_food(Pos::new(10, 12)).unwrap();
    game.take_action(Dir::Right).unwrap();
    game.take_action(Dir::Right).unwrap();
    assert_eq!(game.score(), 1);
    game.take_action(Dir::Up).unwrap();

    game.reset().unwrap();
    assert_eq!(game.score(), 0);
    assert!(!game.is_over());
    assert_eq!(game.dir(), Dir::Right);
    assert_eq!(game.snake(), Pos::new(10, 10));
    assert_ne!(game.food(), game.snake());
    // only the fresh snake marker remains
    let snake_cells = (0..20)
        .flat_map(|r| (0..20).map(move |c| Pos::new(r, c)))
        .filter(|&p| game.cell(p) == Some(Cell::Snake))
        .count();
    assert_eq!(snake_cells, 1);
    assert_eq!(game.cell(Pos::new(10, 10)), Some(Cell::Snake));
}

#[test]
fn test_reset_after_leaving_board() {
    let mut game = board(6);
    for _ in 0..15 {
        game.take_action(Dir::Up).unwrap();
    }
    assert!(game.is_over());
    game.reset().unwrap();
    assert!(!game.is_over());
    assert_eq!(game.snake(), Pos::new(10, 10));
}

#[test]
fn test_all_four_actions_always_available() {
    let mut game = board(7);
    assert_eq!(game.available_actions(), &[Dir::Right, Dir::Left, Dir::Up, Dir::Down]);
    game.take_action(Dir::Down).unwrap();
    assert_eq!(game.available_actions().len(), 4);
}

#[test]
fn test_out_of_range_action_is_rejected() {
    let mut game = board(8);
    assert!(matches!(game.take_action_index(7), Err(GameError::InvalidAction(7))));
    assert_eq!(game.snake(), Pos::new(10, 10));
}

#[test]
fn test_state_has_twelve_binary_features() {
    let mut game = board(9);
    for a in [Dir::Up, Dir::Left, Dir::Down, Dir::Down, Dir::Right] {
        game.take_action(a).unwrap();
        let s = game.state();
        assert_eq!(s.features().len(), 12);
        assert!(s.features().iter().all(|&b| b <= 1));
        assert_eq!(s.features()[..4].iter().sum::<u8>(), 1);
    }
}

#[test]
fn test_same_seed_same_food_sequence() {
    let a = board(42);
    let b = board(42);
    assert_eq!(a.food(), b.food());
}
