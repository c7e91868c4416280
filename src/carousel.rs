//! Homepage carousel: poll → select → render.

use rand::Rng;

use crate::catalog::{CatalogProvider, GameRecord};
use crate::config::CarouselConfig;
use crate::error::{PortalError, Result};
use crate::poller::{CancelToken, PollOutcome, PollState, Poller, RetryPolicy, Sleeper};
use crate::render::{TrackSurface, render_plan};
use crate::selection::{filter_playable, plan_tracks};

/// The set of tracks one carousel renders into.
pub trait TrackSet {
    type Track: TrackSurface;

    /// Bind to the page. `Err(id)` names the first container not yet present.
    fn attach(&mut self) -> std::result::Result<(), String>;
    fn tracks_mut(&mut self) -> &mut [Self::Track];
}

/// Plain track lists are always attached.
impl<T: TrackSurface> TrackSet for Vec<T> {
    type Track = T;

    fn attach(&mut self) -> std::result::Result<(), String> {
        Ok(())
    }
    fn tracks_mut(&mut self) -> &mut [T] {
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Cards rendered from the live catalog.
    Rendered(usize),
    /// Catalog never arrived; placeholder dataset rendered instead.
    FallbackRendered(usize),
    /// Catalog arrived but nothing in it is playable.
    NothingPlayable,
    Cancelled,
}

impl StartOutcome {
    /// True when the tracks now show cards from this run.
    pub fn rendered(&self) -> bool {
        matches!(self, StartOutcome::Rendered(_) | StartOutcome::FallbackRendered(_))
    }
}

pub struct Carousel<C: CatalogProvider, R: Rng> {
    config: CarouselConfig,
    catalog: C,
    rng: R,
    last_poll: Option<PollState>,
}

impl<C: CatalogProvider, R: Rng> Carousel<C, R> {
    pub fn new(config: CarouselConfig, catalog: C, rng: R) -> Self {
        Self { config, catalog, rng, last_poll: None }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// State of the most recent poll, if one ran.
    pub fn last_poll(&self) -> Option<PollState> {
        self.last_poll
    }

    /// Wait for the tracks and a populated catalog, then render.
    pub async fn start<S, T>(&mut self, sleeper: S, cancel: CancelToken, tracks: &mut T) -> Result<StartOutcome>
    where
        S: Sleeper,
        T: TrackSet,
    {
        if self.config.initial_delay_ms > 0 {
            sleeper.sleep(self.config.initial_delay_ms).await;
        }
        let policy = RetryPolicy::new(self.config.max_attempts, self.config.retry_delay_ms);
        let mut poller = Poller::new(policy, sleeper, cancel).labelled("carousel");
        let mut missing_track: Option<String> = None;
        let catalog = &self.catalog;
        let outcome = poller
            .poll_until(|| match tracks.attach() {
                Err(id) => {
                    log::warn!("carousel track #{id} not in page yet");
                    missing_track = Some(id);
                    None
                }
                Ok(()) => {
                    missing_track = None;
                    catalog.populated()
                }
            })
            .await;
        self.last_poll = Some(poller.state());

        match outcome {
            PollOutcome::Ready(games) => {
                log::info!("catalog has {} entries", games.len());
                Ok(self.render_games(&games, tracks))
            }
            // a fresh poller per start never reports AlreadyReady
            PollOutcome::Cancelled | PollOutcome::AlreadyReady => Ok(StartOutcome::Cancelled),
            PollOutcome::Exhausted => {
                if let Some(id) = missing_track {
                    return Err(PortalError::RenderTargetMissing(id));
                }
                if self.config.fallback.is_empty() {
                    return Err(PortalError::CatalogUnavailable { attempts: poller.state().attempts_made });
                }
                log::warn!("rendering {} placeholder entries", self.config.fallback.len());
                let fallback = self.config.fallback.clone();
                Ok(match self.render_games(&fallback, tracks) {
                    StartOutcome::Rendered(n) => StartOutcome::FallbackRendered(n),
                    other => other,
                })
            }
        }
    }

    /// Re-render straight from an already populated catalog, skipping the poll.
    /// `None` means the caller has to poll again.
    pub fn reload<T: TrackSet>(&mut self, tracks: &mut T) -> Option<usize> {
        let games = self.catalog.populated()?;
        if let Err(id) = tracks.attach() {
            log::warn!("{}", PortalError::RenderTargetMissing(id));
            return None;
        }
        match self.render_games(&games, tracks) {
            StartOutcome::Rendered(n) => Some(n),
            _ => Some(0),
        }
    }

    /// Select from `games` and replace the contents of every track.
    pub fn render_games<T: TrackSet>(&mut self, games: &[GameRecord], tracks: &mut T) -> StartOutcome {
        if filter_playable(games, &self.config.excluded_names).is_empty() {
            log::error!("no playable games among {} entries", games.len());
            return StartOutcome::NothingPlayable;
        }
        let plan = plan_tracks(games, &self.config, &mut self.rng);
        let rendered = render_plan(&plan, tracks.tracks_mut(), &self.config.placeholder_image);
        log::info!("carousel loaded with {rendered} cards");
        StartOutcome::Rendered(rendered)
    }
}
