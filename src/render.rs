use crate::game::Game;
use crate::pos::Pos;

/// Render the board as plain text: `@` snake, `*` food, `.` empty.
/// Nothing in the simulation depends on this.
pub fn render_game(game: &Game) -> String {
    let mut out = String::with_capacity((game.cols() + 3) * (game.rows() + 4));

    // Top border
    out.push('+');
    out.push_str(&"-".repeat(game.cols()));
    out.push_str("+\n");

    for row in 0..game.rows() as i32 {
        out.push('|');
        for col in 0..game.cols() as i32 {
            let p = Pos::new(row, col);
            let ch = if p == game.snake() {
                '@'
            } else if p == game.food() {
                '*'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push_str("|\n");
    }

    out.push('+');
    out.push_str(&"-".repeat(game.cols()));
    out.push_str("+\n");

    if game.is_over() {
        out.push_str(&format!("GAME OVER  SCORE: {}\n", game.score()));
    } else {
        out.push_str(&format!("SCORE: {}\n", game.score()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_render_marks_snake_and_food() {
        let mut game = Game::with_seed(&GameConfig::square(4), 3).unwrap();
        game.set_food(Pos::new(0, 0)).unwrap();
        let text = render_game(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "+----+");
        assert_eq!(lines[1], "|*...|");
        assert_eq!(lines[3], "|..@.|");
        assert_eq!(lines[6], "SCORE: 0");
    }

    #[test]
    fn test_render_off_board_snake_shows_game_over() {
        let mut game = Game::with_seed(&GameConfig::square(4), 3).unwrap();
        game.set_food(Pos::new(3, 0)).unwrap();
        // (2,2) -> (-1,2) takes three moves; the fourth call ends the game
        for _ in 0..4 {
            game.take_action(crate::pos::Dir::Up).unwrap();
        }
        assert!(game.is_over());
        let text = render_game(&game);
        assert!(!text.contains('@'));
        assert!(text.ends_with("GAME OVER  SCORE: 0\n"));
    }
}
