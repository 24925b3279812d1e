use std::path::PathBuf;

use vocab_store::HistoryStore;

use crate::{
    media::{AudioProvider, ImageProvider, MediaHost, VideoComposer},
    poll::PollPolicy,
    processor::{ReelProcessor, RemoteCleanup},
    publish::Publisher,
    vocab::VocabularySource,
};

pub struct ReelProcessorBuilder<V = (), I = (), A = (), C = (), M = (), P = (), H = ()> {
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

impl ReelProcessorBuilder {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            vocab_source: (),
            image_provider: (),
            audio_provider: (),
            composer: (),
            media_host: (),
            publisher: (),
            history: (),
            image_poll: PollPolicy::default(),
            publish_poll: PollPolicy::default(),
            remote_cleanup: RemoteCleanup::default(),
        }
    }
}

impl<V, I, A, C, M, P, H> ReelProcessorBuilder<V, I, A, C, M, P, H> {
    pub fn vocab_source<V2: VocabularySource + Send + Sync + 'static>(
        self,
        vocab_source: V2,
    ) -> ReelProcessorBuilder<V2, I, A, C, M, P, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn image_provider<I2: ImageProvider + Send + Sync + 'static>(
        self,
        image_provider: I2,
    ) -> ReelProcessorBuilder<V, I2, A, C, M, P, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn audio_provider<A2: AudioProvider + Send + Sync + 'static>(
        self,
        audio_provider: A2,
    ) -> ReelProcessorBuilder<V, I, A2, C, M, P, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn composer<C2: VideoComposer + Send + Sync + 'static>(
        self,
        composer: C2,
    ) -> ReelProcessorBuilder<V, I, A, C2, M, P, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn media_host<M2: MediaHost + Send + Sync + 'static>(
        self,
        media_host: M2,
    ) -> ReelProcessorBuilder<V, I, A, C, M2, P, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn publisher<P2: Publisher + Send + Sync + 'static>(
        self,
        publisher: P2,
    ) -> ReelProcessorBuilder<V, I, A, C, M, P2, H> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    pub fn history<H2: HistoryStore + Send + Sync + 'static>(
        self,
        history: H2,
    ) -> ReelProcessorBuilder<V, I, A, C, M, P, H2> {
        ReelProcessorBuilder {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }

    /// Attempt budget for image generation polling
    pub fn image_poll(mut self, policy: PollPolicy) -> Self {
        self.image_poll = policy;
        self
    }

    /// Attempt budget for publish retries
    pub fn publish_poll(mut self, policy: PollPolicy) -> Self {
        self.publish_poll = policy;
        self
    }

    pub fn remote_cleanup(mut self, remote_cleanup: RemoteCleanup) -> Self {
        self.remote_cleanup = remote_cleanup;
        self
    }
}

impl<V, I, A, C, M, P, H> ReelProcessorBuilder<V, I, A, C, M, P, H>
where
    V: VocabularySource + Send + Sync + 'static,
    I: ImageProvider + Send + Sync + 'static,
    A: AudioProvider + Send + Sync + 'static,
    C: VideoComposer + Send + Sync + 'static,
    M: MediaHost + Send + Sync + 'static,
    P: Publisher + Send + Sync + 'static,
    H: HistoryStore + Send + Sync + 'static,
{
    pub fn build(self) -> ReelProcessor<V, I, A, C, M, P, H> {
        ReelProcessor {
            workdir: self.workdir,
            vocab_source: self.vocab_source,
            image_provider: self.image_provider,
            audio_provider: self.audio_provider,
            composer: self.composer,
            media_host: self.media_host,
            publisher: self.publisher,
            history: self.history,
            image_poll: self.image_poll,
            publish_poll: self.publish_poll,
            remote_cleanup: self.remote_cleanup,
        }
    }
}
