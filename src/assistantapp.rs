use eframe::egui;
use poll_promise::Promise;
use tokio::runtime::Runtime;
use tracing::error;

use crate::config::ApiConfig;
use crate::error::ExchangeError;
use crate::mode::Mode;
use crate::openaiclient::{ExchangeReply, OpenAiClient};

/// What the worker thread hands back once a round trip finishes. For
/// images the bytes are already decoded to pixels off the UI thread;
/// the shell only uploads the texture.
pub enum PromptOutcome {
    Text(String),
    Image { url: String, image: egui::ColorImage },
}

pub struct AssistantApp {
    pub client: OpenAiClient,
    pub input: String,
    pub mode: Mode,
    pub pending: Option<Promise<Result<PromptOutcome, ExchangeError>>>,
    pub output_text: String,
    pub error_message: Option<String>,
    pub image_texture: Option<egui::TextureHandle>,
    pub image_url: Option<String>,
}

impl AssistantApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_client(OpenAiClient::new(ApiConfig::from_env()))
    }

    pub fn with_client(client: OpenAiClient) -> Self {
        Self {
            client,
            input: String::new(),
            mode: Mode::Chat,
            pending: None,
            output_text: String::new(),
            error_message: None,
            image_texture: None,
            image_url: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Kick off one exchange on a worker thread. Ignored while a call
    /// is already outstanding, so no two requests ever overlap.
    pub fn send_prompt(&mut self, _ctx: &egui::Context) {
        if self.input.is_empty() || self.pending.is_some() {
            return;
        }

        let prompt = self.input.clone();
        let mode = self.mode;
        let client = self.client.clone();

        self.error_message = None;

        self.pending = Some(Promise::spawn_thread("exchange".to_string(), move || {
            let rt = Runtime::new().unwrap();
            rt.block_on(async move {
                match client.exchange(&prompt, mode).await? {
                    ExchangeReply::Text(text) => Ok(PromptOutcome::Text(text)),
                    ExchangeReply::ImageUrl(url) => {
                        let bytes = client.fetch_image_bytes(&url).await?;
                        let image = decode_color_image(&bytes)?;
                        Ok(PromptOutcome::Image { url, image })
                    }
                }
            })
        }));
    }

    /// Collect a finished exchange, if any, and push it into the
    /// output widgets.
    pub fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(promise) = self.pending.take() else {
            return;
        };

        match promise.try_take() {
            Err(still_running) => self.pending = Some(still_running),
            Ok(Ok(PromptOutcome::Text(text))) => {
                self.output_text = text;
                self.image_texture = None;
                self.image_url = None;
                ctx.request_repaint();
            }
            Ok(Ok(PromptOutcome::Image { url, image })) => {
                self.image_texture =
                    Some(ctx.load_texture("generated-image", image, egui::TextureOptions::LINEAR));
                self.image_url = Some(url);
                self.output_text.clear();
                ctx.request_repaint();
            }
            Ok(Err(err)) => {
                error!(%err, "exchange failed");
                self.error_message = Some(err.to_string());
                ctx.request_repaint();
            }
        }
    }

    pub fn clear_output(&mut self) {
        self.input.clear();
        self.output_text.clear();
        self.error_message = None;
        self.image_texture = None;
        self.image_url = None;
    }
}

fn decode_color_image(bytes: &[u8]) -> Result<egui::ColorImage, ExchangeError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ExchangeError::Malformed(format!("could not decode image data: {}", e)))?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}
