use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use chrono_tz::America::Los_Angeles;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::dto::game::Game;

use super::{
    error::UpstreamError,
    fields::{LIVE_GAME_FIELDS, SCHEDULE_FIELDS},
    models::{LiveGame, Schedule},
    projection,
};

/// Hard per-request deadline; the caller's cancellation token may cut a
/// request shorter, never longer.
const REQUEST_DEADLINE: Duration = Duration::from_secs(10);

/// Thin wrapper over the MLB Stats API. Cloning is cheap; the inner
/// `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct MlbClient {
    http: Client,
    base_url: Arc<str>,
}

impl MlbClient {
    /// Build a client against the given base URL (e.g. `https://statsapi.mlb.com`).
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(REQUEST_DEADLINE)
            .build()
            .map_err(|source| UpstreamError::ClientBuilder { source })?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// List the games scheduled on `date` (`MM/DD/YYYY`), or on today's date
    /// in America/Los_Angeles when `date` is empty. Returns each game id
    /// paired with its absolute refresh URL.
    pub async fn list_schedule(
        &self,
        cancel: &CancellationToken,
        date: &str,
    ) -> Result<Vec<(u32, String)>, UpstreamError> {
        let date = if date.is_empty() {
            format_schedule_date(Utc::now())
        } else {
            date.to_string()
        };

        let url = format!(
            "{}/api/v1/schedule/?sportId=1&date={}&fields={}",
            self.base_url, date, &*SCHEDULE_FIELDS
        );
        info!(%url, "requesting schedule");

        let schedule: Schedule = self.get_json(cancel, &url).await?;
        let Some(today) = schedule.dates.first() else {
            return Err(UpstreamError::EmptySchedule { date });
        };

        Ok(today
            .games
            .iter()
            .map(|game| {
                let link = format!(
                    "{}{}?fields={}",
                    self.base_url, game.link, &*LIVE_GAME_FIELDS
                );
                (game.game_pk, link)
            })
            .collect())
    }

    /// Hydrate one game from its refresh URL and project it into the domain
    /// record.
    pub async fn fetch_game(
        &self,
        cancel: &CancellationToken,
        link: &str,
    ) -> Result<Game, UpstreamError> {
        let live: LiveGame = self.get_json(cancel, link).await?;
        Ok(projection::project(live, link))
    }

    /// Issue a GET and decode the JSON body, racing the caller's cancellation
    /// token against the request.
    async fn get_json<T>(&self, cancel: &CancellationToken, url: &str) -> Result<T, UpstreamError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(UpstreamError::Cancelled),
            outcome = self.http.get(url).send() => {
                outcome.map_err(|source| UpstreamError::RequestSend {
                    url: url.to_string(),
                    source,
                })?
            }
        };

        if !response.status().is_success() {
            return Err(UpstreamError::RequestStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => Err(UpstreamError::Cancelled),
            decoded = response.json::<T>() => {
                decoded.map_err(|source| UpstreamError::DecodeResponse {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}

/// Format a UTC instant as the schedule date string in Pacific time. The
/// upstream flips its "today" at Pacific midnight, hours after UTC does.
fn format_schedule_date(when: DateTime<Utc>) -> String {
    when.with_timezone(&Los_Angeles)
        .format("%m/%d/%Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_date_uses_pacific_time() {
        // 05:00 UTC on Aug 2 is still Aug 1 in Los Angeles (UTC-7 in summer).
        let when = "2026-08-02T05:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(format_schedule_date(when), "08/01/2026");

        let when = "2026-08-02T18:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(format_schedule_date(when), "08/02/2026");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MlbClient::new("http://example.invalid/").unwrap();
        assert_eq!(&*client.base_url, "http://example.invalid");
    }
}
