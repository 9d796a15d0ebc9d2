//! trawl TUI: ratatui search surface over a [`trawl_core::SearchSession`].

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use trawl_core::{config::Config, RemoteLookup, SearchSession, SelectionSet};

/// Run the interactive search until the user quits and return the final
/// selection.
///
/// Remote lookups are spawned on the ambient tokio runtime, so the caller
/// must have one entered.
pub fn run<L: RemoteLookup>(session: SearchSession<L>, config: Config) -> anyhow::Result<SelectionSet> {
    let theme = theme::Theme::by_name(&config.ui.theme);
    let mut app = App::new(session, config, theme);
    app.run()?;
    Ok(app.into_selection())
}
