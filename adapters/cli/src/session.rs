//! Glue between the campaign, the live level and the rendering backend.

use anyhow::{anyhow, Result};
use stealth_maze_core::Event;
use stealth_maze_rendering::{Banner, Scene, SessionState, TurnInput};
use stealth_maze_system_campaign::{Campaign, Outcome, Progress};
use stealth_maze_world::{play_turn, query, Level};

/// One play-through of a campaign.
#[derive(Debug)]
pub(crate) struct Session {
    campaign: Campaign,
    layouts: Vec<Option<String>>,
    progress: Progress,
    level: Level,
    awaiting_dismissal: bool,
    events: Vec<Event>,
}

impl Session {
    /// Starts the campaign at the zero-based level, clamped to the last one.
    ///
    /// `layouts` holds the layout text of each level, where one was loaded.
    pub(crate) fn new(
        campaign: Campaign,
        layouts: Vec<Option<String>>,
        start: usize,
    ) -> Result<Self> {
        let progress = Progress::starting_at(&campaign, start);
        let level = build_level(&campaign, &layouts, progress.current())?;
        Ok(Self {
            campaign,
            layouts,
            progress,
            level,
            awaiting_dismissal: false,
            events: Vec::new(),
        })
    }

    /// Scene of the level currently in play, without a banner.
    pub(crate) fn scene(&self) -> Scene {
        let (width, height) = query::dimensions(&self.level);
        Scene::compose(
            width,
            height,
            |position| query::cell_symbol(&self.level, position),
            &query::player(&self.level),
            &query::enemy_view(&self.level),
            self.progress.current(),
        )
    }

    /// Consumes one input and refreshes `scene` to match.
    pub(crate) fn handle(&mut self, input: TurnInput, scene: &mut Scene) -> SessionState {
        if input == TurnInput::Quit {
            return SessionState::Aborted;
        }
        if self.awaiting_dismissal {
            self.awaiting_dismissal = false;
            scene.set_banner(None);
            return SessionState::Running;
        }

        self.events.clear();
        play_turn(&mut self.level, input.direction(), &mut self.events);
        tracing::trace!(events = self.events.len(), "turn played");

        match self.progress.evaluate(&self.level) {
            Outcome::InProgress => {
                *scene = self.scene();
                SessionState::Running
            }
            Outcome::LevelCleared { next } => {
                let level = match build_level(&self.campaign, &self.layouts, next) {
                    Ok(level) => level,
                    Err(error) => {
                        tracing::error!(%error, "next level unavailable");
                        return SessionState::Aborted;
                    }
                };
                let _ = self.progress.advance();
                self.level = level;
                self.awaiting_dismissal = true;
                *scene = self.scene();
                scene.set_banner(Some(Banner::LevelCleared));
                SessionState::Running
            }
            Outcome::Victory => self.finish(scene, Banner::Victory),
            Outcome::Defeat => self.finish(scene, Banner::Defeat),
        }
    }

    fn finish(&self, scene: &mut Scene, banner: Banner) -> SessionState {
        tracing::info!(?banner, level = self.progress.current() + 1, "session finished");
        *scene = self.scene();
        scene.set_banner(Some(banner));
        SessionState::Finished
    }
}

fn build_level(campaign: &Campaign, layouts: &[Option<String>], index: usize) -> Result<Level> {
    let blueprint = campaign
        .level(index)
        .ok_or_else(|| anyhow!("campaign has no level {}", index + 1))?;
    tracing::info!(level = index + 1, name = %blueprint.name, "loading level");
    let layout = layouts.get(index).and_then(Option::as_deref);
    Ok(blueprint.instantiate(layout))
}
