//! Test utilities for cinereel_studio tests.
//!
//! This module provides a scripted backend, a counting credential provider, a
//! store with switchable write failures and a studio builder wired to an
//! in-memory store.

#![allow(dead_code)]

pub mod failing_store;
pub mod mock_backend;
pub mod mock_credentials;

#[allow(unused_imports)]
pub use failing_store::FailingStore;
#[allow(unused_imports)]
pub use mock_backend::{MockBackend, MockResponse};
#[allow(unused_imports)]
pub use mock_credentials::MockCredentials;

use cinereel_core::{EncodedImage, SceneRecord};
use cinereel_error::CinereelResult;
use cinereel_models::{ModelSelection, PollConfig, StudioModels};
use cinereel_storage::{InMemoryProjectStore, ProjectStore};
use cinereel_studio::{Studio, StudioSettings};
use std::sync::Arc;

/// Everything a studio test needs to inspect.
pub struct Harness {
    pub studio: Studio,
    pub backend: Arc<MockBackend>,
    pub store: Arc<InMemoryProjectStore>,
    pub credentials: Arc<MockCredentials>,
}

impl Harness {
    pub async fn new(backend: MockBackend) -> Self {
        Self::with_store(backend, Arc::new(InMemoryProjectStore::new())).await
    }

    pub async fn with_store(backend: MockBackend, store: Arc<InMemoryProjectStore>) -> Self {
        Self::with_parts(backend, store, MockCredentials::with_key("AIza-test")).await
    }

    pub async fn with_parts(
        backend: MockBackend,
        store: Arc<InMemoryProjectStore>,
        credentials: MockCredentials,
    ) -> Self {
        Self::assemble(backend, store.clone(), store, credentials).await
    }

    /// Studio writing through a [`FailingStore`] over the inspected store.
    pub async fn with_failing_store(backend: MockBackend) -> (Self, Arc<FailingStore>) {
        let store = Arc::new(InMemoryProjectStore::new());
        let failing = Arc::new(FailingStore::new(store.clone()));
        let harness = Self::assemble(
            backend,
            failing.clone(),
            store,
            MockCredentials::with_key("AIza-test"),
        )
        .await;
        (harness, failing)
    }

    async fn assemble(
        backend: MockBackend,
        studio_store: Arc<dyn ProjectStore>,
        store: Arc<InMemoryProjectStore>,
        credentials: MockCredentials,
    ) -> Self {
        let backend = Arc::new(backend);
        let credentials = Arc::new(credentials);
        let studio = open_studio(backend.clone(), studio_store, credentials.clone())
            .await
            .expect("studio opens");
        Self {
            studio,
            backend,
            store,
            credentials,
        }
    }

    /// Fill title, synopsis and one hero image (consumes one analysis answer).
    pub async fn prepare_draft(&self, scene_count: u32) {
        self.studio.set_title("Laut").await.unwrap();
        self.studio
            .set_synopsis("A fisher's daughter sails into the storm to find her father.")
            .await
            .unwrap();
        self.studio.set_scene_count(scene_count).await.unwrap();
        self.studio
            .add_hero_images(vec![hero_image(0)])
            .await
            .unwrap();
    }
}

/// Open a studio over any store with default settings.
pub async fn open_studio(
    backend: Arc<MockBackend>,
    store: Arc<dyn ProjectStore>,
    credentials: Arc<MockCredentials>,
) -> CinereelResult<Studio> {
    let models = StudioModels::new(backend, ModelSelection::default(), PollConfig::default());
    Studio::open(models, store, credentials, StudioSettings::default()).await
}

pub fn hero_image(seed: u8) -> EncodedImage {
    EncodedImage::from_bytes("image/png", &[seed; 16])
}

pub fn record(n: u32) -> SceneRecord {
    SceneRecord {
        scene_number: n,
        title: format!("Babak {}", n),
        location: "Jeti kampung".to_string(),
        time_of_day: "Senja".to_string(),
        visual: format!("Lantern light over water, shot {}", n),
        action: "Aisyah unties the boat".to_string(),
        emotion: "Tekad".to_string(),
        dialogue: "Tunggu aku, ayah.".to_string(),
        cinematic_notes: "35mm, slow push in, waves".to_string(),
    }
}

pub fn manifest_json(numbers: impl IntoIterator<Item = u32>) -> String {
    let records = numbers.into_iter().map(record).collect::<Vec<_>>();
    serde_json::to_string(&records).unwrap()
}
