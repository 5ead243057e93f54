use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{BoardClient, BoardError, BoardList, Card, NewCard};

const BASE_URL: &str = "https://api.trello.com/1";

/// Trello REST client. Authentication rides on every request as `key` and
/// `token` query parameters.
pub struct TrelloClient {
    api_key: String,
    token: String,
    client: reqwest::Client,
}

impl TrelloClient {
    pub fn new(api_key: String, token: String) -> Self {
        Self {
            api_key,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn auth_params(&self) -> [(&str, &str); 2] {
        [("key", &self.api_key), ("token", &self.token)]
    }
}

#[derive(Deserialize)]
struct TrelloList {
    id: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCardBody<'a> {
    name: &'a str,
    desc: &'a str,
    id_list: &'a str,
    id_board: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrelloCard {
    id: String,
    name: String,
    short_url: Option<String>,
}

#[async_trait]
impl BoardClient for TrelloClient {
    async fn lists(&self, board_id: &str) -> Result<Vec<BoardList>, BoardError> {
        let lists: Vec<TrelloList> = self
            .client
            .get(format!("{BASE_URL}/boards/{board_id}/lists"))
            .query(&self.auth_params())
            .query(&[("fields", "id,name")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(lists
            .into_iter()
            .map(|l| BoardList {
                id: l.id,
                name: l.name,
            })
            .collect())
    }

    async fn create_card<'a>(&self, req: NewCard<'a>) -> Result<Card, BoardError> {
        let body = CreateCardBody {
            name: req.title,
            desc: req.body,
            id_list: req.list_id,
            id_board: req.board_id,
        };

        let resp = self
            .client
            .post(format!("{BASE_URL}/cards"))
            .query(&self.auth_params())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            return Err(format!("card creation returned {status}: {text}").into());
        }

        let card: TrelloCard = resp.json().await?;
        debug!(card_id = %card.id, "Trello accepted card");

        Ok(Card {
            id: card.id,
            title: card.name,
            url: card.short_url,
        })
    }
}
