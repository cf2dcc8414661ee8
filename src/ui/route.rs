#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Title,
    NewGame,
    Game { game_id: String },
}

impl Route {
    pub fn game(game_id: impl Into<String>) -> Self {
        Route::Game {
            game_id: game_id.into(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Title => "/".into(),
            Route::NewGame => "/new-game".into(),
            Route::Game { game_id } => format!("/game/{game_id}"),
        }
    }

    /// `/game/` with no id is still the game route; the screen reports the missing id.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        match path.trim_end_matches('/') {
            "" => Some(Route::Title),
            "/new-game" => Some(Route::NewGame),
            "/game" => Some(Route::game("")),
            other => other
                .strip_prefix("/game/")
                .filter(|id| !id.contains('/'))
                .map(Route::game),
        }
    }
}
