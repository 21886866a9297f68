use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Binary, Bson, DateTime, doc, spec::BinarySubtype},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
};
use crate::dao::{
    models::{
        AnswerEntity, AnswerStatus, PlayerEntity, QuestionEntity, QuestionStatus,
        ReservationEntity,
    },
    quiz_store::QuizStore,
    storage::StorageResult,
};

const PLAYER_COLLECTION: &str = "players";
const QUESTION_COLLECTION: &str = "questions";
const RESERVATION_COLLECTION: &str = "reservations";
const ANSWER_COLLECTION: &str = "answers";

/// MongoDB-backed [`QuizStore`].
#[derive(Clone)]
pub struct MongoQuizStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoQuizStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let players = database.collection::<PlayerDocument>(PLAYER_COLLECTION);
        players
            .create_index(
                IndexModel::builder()
                    .keys(doc! {"nickname": 1})
                    .options(
                        IndexOptions::builder()
                            .name(Some("player_nickname_idx".to_owned()))
                            .unique(Some(true))
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION,
                index: "nickname",
                source,
            })?;

        let questions = database.collection::<QuestionDocument>(QUESTION_COLLECTION);
        questions
            .create_index(
                IndexModel::builder()
                    .keys(doc! {"status": 1, "created_at": -1})
                    .options(
                        IndexOptions::builder()
                            .name(Some("question_status_idx".to_owned()))
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: QUESTION_COLLECTION,
                index: "status,created_at",
                source,
            })?;

        let reservations = database.collection::<ReservationDocument>(RESERVATION_COLLECTION);
        reservations
            .create_index(
                IndexModel::builder()
                    .keys(doc! {"question_id": 1, "reserved_at": 1})
                    .options(
                        IndexOptions::builder()
                            .name(Some("reservation_question_idx".to_owned()))
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: RESERVATION_COLLECTION,
                index: "question_id,reserved_at",
                source,
            })?;

        // One pending answer per (question, reservation) pair. Rejected
        // answers stay behind as history and must not block a resubmission
        // after the question reopens.
        let answers = database.collection::<AnswerDocument>(ANSWER_COLLECTION);
        answers
            .create_index(
                IndexModel::builder()
                    .keys(doc! {"question_id": 1, "reservation_id": 1})
                    .options(
                        IndexOptions::builder()
                            .name(Some("answer_reservation_idx".to_owned()))
                            .unique(Some(true))
                            .partial_filter_expression(Some(doc! {"status": "pending"}))
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ANSWER_COLLECTION,
                index: "question_id,reservation_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn players(&self) -> Collection<PlayerDocument> {
        self.database().await.collection(PLAYER_COLLECTION)
    }

    async fn questions(&self) -> Collection<QuestionDocument> {
        self.database().await.collection(QUESTION_COLLECTION)
    }

    async fn reservations(&self) -> Collection<ReservationDocument> {
        self.database().await.collection(RESERVATION_COLLECTION)
    }

    async fn answers(&self) -> Collection<AnswerDocument> {
        self.database().await.collection(ANSWER_COLLECTION)
    }

    async fn insert_player(&self, player: PlayerEntity) -> MongoResult<bool> {
        let id = player.id;
        let document: PlayerDocument = player.into();
        match self.players().await.insert_one(&document).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key(&err) => Ok(false),
            Err(source) => Err(MongoDaoError::Write {
                kind: "player",
                id,
                source,
            }),
        }
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        self.players()
            .await
            .find_one(doc_id(id))
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Load {
                kind: "player",
                id,
                source,
            })
    }

    async fn find_player_by_nickname(&self, nickname: &str) -> MongoResult<Option<PlayerEntity>> {
        self.players()
            .await
            .find_one(doc! {"nickname": nickname})
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Query {
                kind: "player-by-nickname",
                source,
            })
    }

    async fn list_players(&self) -> MongoResult<Vec<PlayerEntity>> {
        let documents: Vec<PlayerDocument> = self
            .players()
            .await
            .find(doc! {})
            .sort(doc! {"nickname": 1})
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-players",
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-players",
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_question(&self, question: QuestionEntity) -> MongoResult<()> {
        let id = question.id;
        let document: QuestionDocument = question.into();
        self.questions()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                kind: "question",
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> MongoResult<Option<QuestionEntity>> {
        self.questions()
            .await
            .find_one(doc_id(id))
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Load {
                kind: "question",
                id,
                source,
            })
    }

    async fn list_questions(&self) -> MongoResult<Vec<QuestionEntity>> {
        self.collect_questions(doc! {}, doc! {"created_at": 1})
            .await
    }

    async fn list_live_questions(&self) -> MongoResult<Vec<QuestionEntity>> {
        let live = status_bson(QuestionStatus::Live)?;
        self.collect_questions(doc! {"status": live}, doc! {"created_at": -1})
            .await
    }

    async fn collect_questions(
        &self,
        filter: mongodb::bson::Document,
        sort: mongodb::bson::Document,
    ) -> MongoResult<Vec<QuestionEntity>> {
        let documents: Vec<QuestionDocument> = self
            .questions()
            .await
            .find(filter)
            .sort(sort)
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-questions",
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-questions",
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_question(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .questions()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Write {
                kind: "question",
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn transition_question(
        &self,
        id: Uuid,
        expected: QuestionStatus,
        next: QuestionStatus,
        approved_reservation: Option<Uuid>,
    ) -> MongoResult<bool> {
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "status": status_bson(expected)?,
        };
        let update = doc! {
            "$set": {
                "status": status_bson(next)?,
                "approved_reservation": match approved_reservation {
                    Some(reservation_id) => Bson::Binary(uuid_as_binary(reservation_id)),
                    None => Bson::Null,
                },
            }
        };

        let result = self
            .questions()
            .await
            .update_one(filter, update)
            .await
            .map_err(|source| MongoDaoError::Write {
                kind: "question",
                id,
                source,
            })?;

        Ok(result.matched_count > 0)
    }

    async fn save_reservation(&self, reservation: ReservationEntity) -> MongoResult<()> {
        let id = reservation.id;
        let document: ReservationDocument = reservation.into();
        self.reservations()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                kind: "reservation",
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_reservation(&self, id: Uuid) -> MongoResult<Option<ReservationEntity>> {
        self.reservations()
            .await
            .find_one(doc_id(id))
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Load {
                kind: "reservation",
                id,
                source,
            })
    }

    async fn find_reservation_for_player(
        &self,
        question_id: Uuid,
        player_id: Uuid,
    ) -> MongoResult<Option<ReservationEntity>> {
        self.reservations()
            .await
            .find_one(doc! {
                "question_id": uuid_as_binary(question_id),
                "player_id": uuid_as_binary(player_id),
            })
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Query {
                kind: "reservation-for-player",
                source,
            })
    }

    async fn list_reservations(&self, question_id: Uuid) -> MongoResult<Vec<ReservationEntity>> {
        let documents: Vec<ReservationDocument> = self
            .reservations()
            .await
            .find(doc! {"question_id": uuid_as_binary(question_id)})
            .sort(doc! {"reserved_at": 1})
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-reservations",
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-reservations",
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_answer(&self, answer: AnswerEntity) -> MongoResult<bool> {
        let id = answer.id;
        let document: AnswerDocument = answer.into();
        match self.answers().await.insert_one(&document).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key(&err) => Ok(false),
            Err(source) => Err(MongoDaoError::Write {
                kind: "answer",
                id,
                source,
            }),
        }
    }

    async fn save_answer(&self, answer: AnswerEntity) -> MongoResult<()> {
        let id = answer.id;
        let document: AnswerDocument = answer.into();
        self.answers()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                kind: "answer",
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_answer(&self, id: Uuid) -> MongoResult<Option<AnswerEntity>> {
        self.answers()
            .await
            .find_one(doc_id(id))
            .await
            .map(|document| document.map(Into::into))
            .map_err(|source| MongoDaoError::Load {
                kind: "answer",
                id,
                source,
            })
    }

    async fn list_answers(&self, question_id: Uuid) -> MongoResult<Vec<AnswerEntity>> {
        let documents: Vec<AnswerDocument> = self
            .answers()
            .await
            .find(doc! {"question_id": uuid_as_binary(question_id)})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-answers",
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                kind: "list-answers",
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl QuizStore for MongoQuizStore {
    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.insert_player(player).await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn find_player_by_nickname(
        &self,
        nickname: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_player_by_nickname(&nickname)
                .await
                .map_err(Into::into)
        })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players().await.map_err(Into::into) })
    }

    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_question(question).await.map_err(Into::into) })
    }

    fn find_question(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_question(id).await.map_err(Into::into) })
    }

    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_questions().await.map_err(Into::into) })
    }

    fn list_live_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_live_questions().await.map_err(Into::into) })
    }

    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_question(id).await.map_err(Into::into) })
    }

    fn transition_question(
        &self,
        id: Uuid,
        expected: QuestionStatus,
        next: QuestionStatus,
        approved_reservation: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .transition_question(id, expected, next, approved_reservation)
                .await
                .map_err(Into::into)
        })
    }

    fn save_reservation(
        &self,
        reservation: ReservationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_reservation(reservation).await.map_err(Into::into) })
    }

    fn find_reservation(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_reservation(id).await.map_err(Into::into) })
    }

    fn find_reservation_for_player(
        &self,
        question_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ReservationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_reservation_for_player(question_id, player_id)
                .await
                .map_err(Into::into)
        })
    }

    fn list_reservations(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ReservationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_reservations(question_id)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.insert_answer(answer).await.map_err(Into::into) })
    }

    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_answer(answer).await.map_err(Into::into) })
    }

    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_answer(id).await.map_err(Into::into) })
    }

    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_answers(question_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    nickname: String,
    password_hash: String,
    is_admin: bool,
    joined_at: DateTime,
}

impl From<PlayerEntity> for PlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            nickname: value.nickname,
            password_hash: value.password_hash,
            is_admin: value.is_admin,
            joined_at: DateTime::from_system_time(value.joined_at),
        }
    }
}

impl From<PlayerDocument> for PlayerEntity {
    fn from(value: PlayerDocument) -> Self {
        Self {
            id: value.id,
            nickname: value.nickname,
            password_hash: value.password_hash,
            is_admin: value.is_admin,
            joined_at: value.joined_at.to_system_time(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct QuestionDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    text: String,
    created_at: DateTime,
    status: QuestionStatus,
    approved_reservation: Option<Uuid>,
}

impl From<QuestionEntity> for QuestionDocument {
    fn from(value: QuestionEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            created_at: DateTime::from_system_time(value.created_at),
            status: value.status,
            approved_reservation: value.approved_reservation,
        }
    }
}

impl From<QuestionDocument> for QuestionEntity {
    fn from(value: QuestionDocument) -> Self {
        Self {
            id: value.id,
            text: value.text,
            created_at: value.created_at.to_system_time(),
            status: value.status,
            approved_reservation: value.approved_reservation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReservationDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    question_id: Uuid,
    player_id: Uuid,
    reserved_at: DateTime,
    approved: bool,
}

impl From<ReservationEntity> for ReservationDocument {
    fn from(value: ReservationEntity) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            player_id: value.player_id,
            reserved_at: DateTime::from_system_time(value.reserved_at),
            approved: value.approved,
        }
    }
}

impl From<ReservationDocument> for ReservationEntity {
    fn from(value: ReservationDocument) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            player_id: value.player_id,
            reserved_at: value.reserved_at.to_system_time(),
            approved: value.approved,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AnswerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    question_id: Uuid,
    player_id: Uuid,
    reservation_id: Uuid,
    text: String,
    created_at: DateTime,
    status: AnswerStatus,
}

impl From<AnswerEntity> for AnswerDocument {
    fn from(value: AnswerEntity) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            player_id: value.player_id,
            reservation_id: value.reservation_id,
            text: value.text,
            created_at: DateTime::from_system_time(value.created_at),
            status: value.status,
        }
    }
}

impl From<AnswerDocument> for AnswerEntity {
    fn from(value: AnswerDocument) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            player_id: value.player_id,
            reservation_id: value.reservation_id,
            text: value.text,
            created_at: value.created_at.to_system_time(),
            status: value.status,
        }
    }
}

fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

fn doc_id(id: Uuid) -> mongodb::bson::Document {
    doc! {"_id": uuid_as_binary(id)}
}

fn status_bson<S: Serialize>(status: S) -> MongoResult<Bson> {
    mongodb::bson::serialize_to_bson(&status).map_err(|source| MongoDaoError::EncodeStatus { source })
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
