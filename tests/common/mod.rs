//! Shared test helpers and mock backend.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use orca_tts::backend::{
    BackendHandle, BackendResult, Status, StreamHandle, SynthesisBackend,
};
use orca_tts::types::{PhonemeAlignment, SynthesisParams, WordAlignment};

/// Samples rendered per (valid) character, before speech-rate scaling.
pub const SAMPLES_PER_CHAR: usize = 160;

/// Characters the mock engine accepts, order-preserving.
pub fn mock_valid_characters() -> Vec<char> {
    let mut chars: Vec<char> = Vec::new();
    chars.extend('a'..='z');
    chars.extend('A'..='Z');
    chars.extend('0'..='9');
    chars.extend([' ', ',', '.', '?', '!', '\'', '-', ':', ';', '{', '}', '|']);
    chars
}

fn is_valid_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ",.?!'-:;".contains(c)
}

/// A deterministic scripted backend.
///
/// Renders a fixed number of samples per character (scaled by the inverse
/// speech rate), buffers stream text until a token is complete, and supports
/// injecting the next call's failure together with its diagnostic stack.
pub struct MockBackend {
    sample_rate: u32,
    max_character_limit: usize,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    engines: HashSet<u64>,
    streams: HashMap<u64, StreamState>,
    stack: Vec<String>,
    injected: VecDeque<(Status, Vec<String>)>,
    synthesize_calls: usize,
    deletes: usize,
}

struct StreamState {
    buffer: String,
    speech_rate: f32,
}

enum Token {
    Plain(String),
    Pronounced { word: String, phonemes: Vec<String> },
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            sample_rate: 22_050,
            max_character_limit: 2_000,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_character_limit(mut self, limit: usize) -> Self {
        self.max_character_limit = limit;
        self
    }

    /// Script the next backend call to fail with `status`, leaving the
    /// given diagnostic stack behind.
    pub fn inject_failure(&self, status: Status, stack: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .injected
            .push_back((status, stack.iter().map(|s| s.to_string()).collect()));
    }

    /// Number of one-shot synthesis calls that reached the backend.
    pub fn synthesize_calls(&self) -> usize {
        self.state.lock().unwrap().synthesize_calls
    }

    /// Number of handle deletions observed.
    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    /// Number of backend-side streams currently open.
    pub fn open_streams(&self) -> usize {
        self.state.lock().unwrap().streams.len()
    }

    fn check_injected(&self, state: &mut State) -> BackendResult<()> {
        if let Some((status, stack)) = state.injected.pop_front() {
            state.stack = stack;
            return Err(status);
        }
        Ok(())
    }

    fn fail(state: &mut State, status: Status, messages: &[&str]) -> Status {
        state.stack = messages.iter().map(|s| s.to_string()).collect();
        status
    }

    fn validate_rate(state: &mut State, params: &SynthesisParams) -> BackendResult<f32> {
        let rate = params.speech_rate.unwrap_or(1.0);
        if !(0.7..=1.3).contains(&rate) {
            return Err(Self::fail(
                state,
                Status::InvalidArgument,
                &["speech rate must be within [0.7, 1.3]"],
            ));
        }
        Ok(rate)
    }

    fn render(&self, tokens: &[Token], speech_rate: f32) -> (Vec<i16>, Vec<WordAlignment>) {
        let mut pcm: Vec<i16> = Vec::new();
        let mut words: Vec<WordAlignment> = Vec::new();
        let mut cursor = 0usize;

        for token in tokens {
            let (word, phonemes) = match token {
                Token::Plain(word) => {
                    let phonemes: Vec<String> =
                        word.chars().map(|c| c.to_uppercase().to_string()).collect();
                    (word.clone(), phonemes)
                }
                Token::Pronounced { word, phonemes } => (word.clone(), phonemes.clone()),
            };

            let samples =
                ((word.chars().count() * SAMPLES_PER_CHAR) as f32 / speech_rate).round() as usize;
            for i in 0..samples {
                pcm.push(((i % 64) as i16 - 32) * 128);
            }

            let start_sec = cursor as f32 / self.sample_rate as f32;
            let end_sec = (cursor + samples) as f32 / self.sample_rate as f32;
            let n = phonemes.len().max(1);
            let phonemes = phonemes
                .iter()
                .enumerate()
                .map(|(i, p)| PhonemeAlignment {
                    phoneme: p.clone(),
                    start_sec: start_sec + (end_sec - start_sec) * i as f32 / n as f32,
                    end_sec: start_sec + (end_sec - start_sec) * (i + 1) as f32 / n as f32,
                })
                .collect();

            words.push(WordAlignment {
                word,
                start_sec,
                end_sec,
                phonemes,
            });
            cursor += samples;
        }

        (pcm, words)
    }
}

/// Split text into word tokens, treating `{word|PRON}` annotations as
/// single tokens. Characters trailing a closed annotation (punctuation such
/// as `{word|PRON}.`) are ordinary text. Whitespace-only input yields no
/// tokens; a malformed annotation is a structural error.
fn tokenize(text: &str) -> Result<Vec<Token>, ()> {
    let mut tokens = Vec::new();
    for raw in split_outside_braces(text) {
        if raw.starts_with('{') {
            let close = raw.find('}').ok_or(())?;
            let (word, pron) = raw[1..close].split_once('|').ok_or(())?;
            if word.is_empty() || pron.trim().is_empty() {
                return Err(());
            }
            tokens.push(Token::Pronounced {
                word: word.to_string(),
                phonemes: pron.split_whitespace().map(|p| p.to_string()).collect(),
            });
            let trailing: String = raw[close + 1..]
                .chars()
                .filter(|c| is_valid_word_char(*c))
                .collect();
            if !trailing.is_empty() {
                tokens.push(Token::Plain(trailing));
            }
        } else {
            let filtered: String = raw.chars().filter(|c| is_valid_word_char(*c)).collect();
            if !filtered.is_empty() {
                tokens.push(Token::Plain(filtered));
            }
        }
    }
    Ok(tokens)
}

/// Whitespace split that does not split inside `{...}`.
fn split_outside_braces(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                parts.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        parts.push(&text[s..]);
    }
    parts
}

/// Byte offset after the last complete depth-0 token in `buffer`.
fn complete_prefix_end(buffer: &str) -> usize {
    let mut depth = 0usize;
    let mut end = 0usize;
    for (i, c) in buffer.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => end = i + c.len_utf8(),
            _ => {}
        }
    }
    end
}

impl SynthesisBackend for MockBackend {
    fn init(&self, access_key: &str, _model_path: &Path) -> BackendResult<BackendHandle> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if access_key.is_empty() {
            return Err(Self::fail(
                &mut state,
                Status::InvalidArgument,
                &["access key is empty", "engine initialization aborted"],
            ));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.engines.insert(id);
        Ok(BackendHandle(id))
    }

    fn delete(&self, handle: BackendHandle) {
        let mut state = self.state.lock().unwrap();
        if state.engines.remove(&handle.0) {
            state.deletes += 1;
        }
    }

    fn version(&self) -> String {
        "1.0.0-mock".to_string()
    }

    fn sample_rate(&self, handle: BackendHandle) -> BackendResult<u32> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.engines.contains(&handle.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such engine"]));
        }
        Ok(self.sample_rate)
    }

    fn max_character_limit(&self, handle: BackendHandle) -> BackendResult<usize> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.engines.contains(&handle.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such engine"]));
        }
        Ok(self.max_character_limit)
    }

    fn valid_characters(&self, handle: BackendHandle) -> BackendResult<Vec<char>> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.engines.contains(&handle.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such engine"]));
        }
        Ok(mock_valid_characters())
    }

    fn synthesize(
        &self,
        handle: BackendHandle,
        text: &str,
        params: &SynthesisParams,
    ) -> BackendResult<(Vec<i16>, Vec<WordAlignment>)> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        state.synthesize_calls += 1;
        if !state.engines.contains(&handle.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such engine"]));
        }
        let rate = Self::validate_rate(&mut state, params)?;
        if text.trim().is_empty() {
            return Err(Self::fail(
                &mut state,
                Status::InvalidArgument,
                &["text is empty"],
            ));
        }
        let tokens = tokenize(text).map_err(|_| {
            Self::fail(
                &mut state,
                Status::InvalidArgument,
                &["malformed pronunciation annotation"],
            )
        })?;
        Ok(self.render(&tokens, rate))
    }

    fn stream_open(
        &self,
        handle: BackendHandle,
        params: &SynthesisParams,
    ) -> BackendResult<StreamHandle> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.engines.contains(&handle.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such engine"]));
        }
        let rate = Self::validate_rate(&mut state, params)?;
        state.next_id += 1;
        let id = state.next_id;
        state.streams.insert(
            id,
            StreamState {
                buffer: String::new(),
                speech_rate: rate,
            },
        );
        Ok(StreamHandle(id))
    }

    fn stream_synthesize(&self, stream: StreamHandle, text: &str) -> BackendResult<Vec<i16>> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.streams.contains_key(&stream.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such stream"]));
        }

        let (ready, rate) = {
            let ss = state.streams.get_mut(&stream.0).unwrap();
            ss.buffer.push_str(text);
            let end = complete_prefix_end(&ss.buffer);
            let ready: String = ss.buffer.drain(..end).collect();
            (ready, ss.speech_rate)
        };

        let tokens = tokenize(&ready).map_err(|_| {
            Self::fail(
                &mut state,
                Status::InvalidArgument,
                &["malformed pronunciation annotation"],
            )
        })?;
        Ok(self.render(&tokens, rate).0)
    }

    fn stream_flush(&self, stream: StreamHandle) -> BackendResult<Vec<i16>> {
        let mut state = self.state.lock().unwrap();
        self.check_injected(&mut state)?;
        if !state.streams.contains_key(&stream.0) {
            return Err(Self::fail(&mut state, Status::InvalidState, &["no such stream"]));
        }

        let (rest, rate) = {
            let ss = state.streams.get_mut(&stream.0).unwrap();
            let rest = std::mem::take(&mut ss.buffer);
            (rest, ss.speech_rate)
        };

        let tokens = tokenize(&rest).map_err(|_| {
            Self::fail(
                &mut state,
                Status::InvalidArgument,
                &["malformed pronunciation annotation"],
            )
        })?;
        Ok(self.render(&tokens, rate).0)
    }

    fn stream_close(&self, stream: StreamHandle) {
        self.state.lock().unwrap().streams.remove(&stream.0);
    }

    fn error_stack(&self) -> Vec<String> {
        let mut stack = std::mem::take(&mut self.state.lock().unwrap().stack);
        stack.truncate(8);
        stack
    }
}
