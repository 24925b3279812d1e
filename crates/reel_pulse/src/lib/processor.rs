pub mod builder;

use std::path::{Path, PathBuf};

use vocab_store::HistoryStore;

use crate::{
    media::{
        await_result, AudioProvider, HostedMedia, ImageProvider, MediaAsset, MediaHost,
        VideoComposer,
    },
    poll::PollPolicy,
    prompt::build_image_prompt,
    publish::{publish, PublishContainer, Publisher},
    vocab::{VocabularyItem, VocabularySource},
    Error, PipelineError, Stage,
};

/// Whether an uploaded video is removed from the media host when the
/// publish step did not succeed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemoteCleanup {
    /// Delete only after a successful publish; a failed publish leaves the
    /// hosted video in place
    #[default]
    AfterPublish,
    /// Delete whenever an upload happened
    Always,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub word: String,
    pub published_id: String,
    pub remote_deleted: bool,
}

/// The three local files a run produces, at fixed names inside the workdir
#[derive(Debug, Clone)]
pub struct RunAssets {
    pub image: MediaAsset,
    pub audio: MediaAsset,
    pub video: MediaAsset,
}

impl RunAssets {
    pub const IMAGE_FILE: &str = "vocab_image.jpg";
    pub const AUDIO_FILE: &str = "vocab_audio.mp3";
    pub const VIDEO_FILE: &str = "vocab_reel.mp4";

    pub fn new(workdir: &Path) -> Self {
        Self {
            image: MediaAsset::local(workdir.join(Self::IMAGE_FILE)),
            audio: MediaAsset::local(workdir.join(Self::AUDIO_FILE)),
            video: MediaAsset::local(workdir.join(Self::VIDEO_FILE)),
        }
    }

    fn local_paths(&self) -> [&Path; 3] {
        [
            self.image.local_path.as_path(),
            self.audio.local_path.as_path(),
            self.video.local_path.as_path(),
        ]
    }
}

/// Vocabulary reel pipeline: word → image + speech → video → hosted → published
#[derive(Debug)]
pub struct ReelProcessor<V, I, A, C, M, P, H>
where
    V: VocabularySource + Send + Sync + 'static,
    I: ImageProvider + Send + Sync + 'static,
    A: AudioProvider + Send + Sync + 'static,
    C: VideoComposer + Send + Sync + 'static,
    M: MediaHost + Send + Sync + 'static,
    P: Publisher + Send + Sync + 'static,
    H: HistoryStore + Send + Sync + 'static,
{
    workdir: PathBuf,
    vocab_source: V,
    image_provider: I,
    audio_provider: A,
    composer: C,
    media_host: M,
    publisher: P,
    history: H,
    image_poll: PollPolicy,
    publish_poll: PollPolicy,
    remote_cleanup: RemoteCleanup,
}

impl<V, I, A, C, M, P, H> ReelProcessor<V, I, A, C, M, P, H>
where
    V: VocabularySource + Send + Sync + 'static,
    I: ImageProvider + Send + Sync + 'static,
    A: AudioProvider + Send + Sync + 'static,
    C: VideoComposer + Send + Sync + 'static,
    M: MediaHost + Send + Sync + 'static,
    P: Publisher + Send + Sync + 'static,
    H: HistoryStore + Send + Sync + 'static,
{
    /// Appended to every caption
    pub const HASHTAGS: &str =
        "#love #instagood #instagram #art #happy #travel #repost #german #germanlanguage";

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs every stage once. Cleanup of local files (and of the hosted
    /// video, per [`RemoteCleanup`]) happens whatever the outcome; the word
    /// is recorded in the history only when the reel was published.
    #[tracing::instrument(skip(self), fields(workdir = %self.workdir.display()))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let mut assets = RunAssets::new(&self.workdir);

        let outcome = self.execute(&mut assets).await;
        let remote_deleted = self.clean_up(&assets, outcome.is_ok()).await;

        let (vocab, published_id) = outcome
            .inspect_err(|e| tracing::error!(stage = %e.stage, kind = e.source.kind(), error = %e.source, "Run failed"))?;

        if let Err(e) = self.history.append(&vocab.target_word) {
            // the reel is already live, so the run still counts as a success
            tracing::error!(error = ?e, word = %vocab.target_word, "Failed to record word in history");
        }

        let report = RunReport {
            word: vocab.target_word,
            published_id,
            remote_deleted,
        };
        tracing::info!(?report, "Run complete");
        Ok(report)
    }

    async fn execute(
        &self,
        assets: &mut RunAssets,
    ) -> Result<(VocabularyItem, String), PipelineError> {
        let vocab = self.fetch_vocab().await.map_err(fail(Stage::FetchVocab))?;

        enter(Stage::BuildPrompt);
        let prompt = Self::build_prompt(&vocab).map_err(fail(Stage::BuildPrompt))?;

        self.generate_image(&prompt, &assets.image.local_path)
            .await
            .map_err(fail(Stage::GenerateImage))?;

        enter(Stage::SynthAudio);
        self.audio_provider
            .synthesize(&vocab.target_word, &assets.audio.local_path)
            .await
            .map_err(fail(Stage::SynthAudio))?;

        enter(Stage::ComposeVideo);
        self.composer
            .compose(
                &assets.image.local_path,
                &assets.audio.local_path,
                &assets.video.local_path,
            )
            .await
            .map_err(fail(Stage::ComposeVideo))?;

        enter(Stage::Upload);
        let hosted = self
            .media_host
            .upload(&assets.video.local_path)
            .await
            .map_err(fail(Stage::Upload))?;
        assets.video.remote = Some(hosted.clone());

        let published_id = self
            .publish(&hosted, &vocab)
            .await
            .map_err(fail(Stage::Publish))?;

        Ok((vocab, published_id))
    }

    async fn fetch_vocab(&self) -> Result<VocabularyItem, Error> {
        enter(Stage::FetchVocab);
        let exclusions = self.history.load().map_err(Error::History)?;

        let vocab = self.vocab_source.fetch(&exclusions).await?;
        tracing::info!(source = %vocab.source_word, target = %vocab.target_word, "Got vocabulary");
        Ok(vocab)
    }

    fn build_prompt(vocab: &VocabularyItem) -> Result<String, Error> {
        if vocab.source_word.trim().is_empty() || vocab.target_word.trim().is_empty() {
            return Err(Error::UpstreamFormat(
                "vocabulary item has an empty word".into(),
            ));
        }
        Ok(build_image_prompt(&vocab.source_word, &vocab.target_word))
    }

    async fn generate_image(&self, prompt: &str, dest: &Path) -> Result<(), Error> {
        enter(Stage::GenerateImage);
        tokio::fs::create_dir_all(&self.workdir).await?;

        let job_id = self.image_provider.submit(prompt).await?;
        let image_url = await_result(&self.image_provider, &job_id, self.image_poll).await?;
        self.image_provider.download(&image_url, dest).await?;

        tracing::info!(path = ?dest, "Image saved");
        Ok(())
    }

    async fn publish(&self, hosted: &HostedMedia, vocab: &VocabularyItem) -> Result<String, Error> {
        enter(Stage::Publish);
        let caption = format!("{} {}", vocab.caption.trim(), Self::HASHTAGS);

        let container_id = self
            .publisher
            .create_container(&hosted.url, &caption)
            .await?;

        let mut container = PublishContainer::new(container_id);
        publish(&self.publisher, &mut container, self.publish_poll)
            .await
            .inspect_err(|_| tracing::warn!(?container, "Container was not published"))
    }

    /// Removes local artifacts and, when due, the hosted video.
    /// Failures are logged and never change the run outcome.
    /// Returns whether the hosted video was deleted.
    async fn clean_up(&self, assets: &RunAssets, published: bool) -> bool {
        let mut remote_deleted = false;

        if let Some(hosted) = &assets.video.remote {
            if published || self.remote_cleanup == RemoteCleanup::Always {
                match self.media_host.delete(&hosted.remote_id).await {
                    Ok(()) => {
                        tracing::info!(remote_id = %hosted.remote_id, "Deleted hosted video");
                        remote_deleted = true;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, remote_id = %hosted.remote_id, "Failed to delete hosted video")
                    }
                }
            } else {
                tracing::warn!(remote_id = %hosted.remote_id, "Leaving hosted video in place after failed publish");
            }
        }

        for path in assets.local_paths() {
            remove_local_file(path).await;
        }

        remote_deleted
    }
}

fn enter(stage: Stage) {
    tracing::info!(%stage, "Entering stage");
}

fn fail(stage: Stage) -> impl FnOnce(Error) -> PipelineError {
    move |source| PipelineError::new(stage, source)
}

/// Deletes `path`; a file that is already gone counts as deleted
async fn remove_local_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(?path, "Removed local artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = ?e, ?path, "Failed to remove local artifact"),
    }
}
