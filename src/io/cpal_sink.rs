//! Default output device through cpal.
//!
//! Writes land in a lock-free ring; the audio callback drains it at the
//! device's own rate and format, so `write` returns as soon as the samples
//! are queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, StreamConfig};
use rtrb::{Consumer, Producer, RingBuffer};
use tokio_util::sync::CancellationToken;

use super::converter::SampleHold;
use super::sink::{window, PcmSink, SinkError};
use crate::config::PlayerConfig;
use crate::dsp::oscillator::measure_samples;

const WRITE_BACKOFF: Duration = Duration::from_millis(2);
const DRAIN_POLL: Duration = Duration::from_millis(5);
// Allowance for the device's own buffer after the ring runs dry
const DEVICE_LATENCY: Duration = Duration::from_millis(100);
// A device that takes no samples for this long is treated as stalled
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

pub struct CpalSink {
    sample_rate: u32,
    ring_capacity: usize,
    cancel: CancellationToken,
    output: Option<Output>,
}

/// An open, playing stream and the producer side of its ring
struct Output {
    stream: cpal::Stream,
    producer: Producer<i8>,
    capacity: usize,
    device_lost: Arc<AtomicBool>,
}

impl Output {
    fn check(&self) -> Result<(), SinkError> {
        if self.device_lost.load(Ordering::Acquire) {
            return Err(SinkError::Stream("output device no longer available".into()));
        }
        Ok(())
    }
}

impl CpalSink {
    pub fn new(config: &PlayerConfig) -> Self {
        let measure = measure_samples(config.sample_rate, config.measure_length_secs);
        Self {
            sample_rate: config.sample_rate,
            ring_capacity: measure * config.ring_measures.max(1) as usize,
            cancel: CancellationToken::new(),
            output: None,
        }
    }

    /// Abort blocking `write`/`drain` calls with [`SinkError::Interrupted`]
    /// once `cancel` fires
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Longest a drain may take: a full ring at the source rate, plus slack
    fn drain_timeout(&self) -> Duration {
        let ring_secs = self.ring_capacity as f64 / self.sample_rate.max(1) as f64;
        Duration::from_secs_f64(ring_secs) + STALL_TIMEOUT
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }
}

impl PcmSink for CpalSink {
    fn open(&mut self) -> Result<(), SinkError> {
        if self.output.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SinkError::DeviceUnavailable("no default output device available".into()))?;
        let supported = device.default_output_config().map_err(|e| {
            SinkError::DeviceUnavailable(format!("failed to fetch default output config: {e}"))
        })?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let (producer, consumer) = RingBuffer::<i8>::new(self.ring_capacity);
        let device_lost = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::F64 => build_stream::<f64>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::I8 => build_stream::<i8>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::I32 => build_stream::<i32>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::U8 => build_stream::<u8>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, consumer, self.sample_rate, &device_lost),
            SampleFormat::U32 => build_stream::<u32>(&device, &config, consumer, self.sample_rate, &device_lost),
            other => Err(SinkError::DeviceUnavailable(format!(
                "unsupported sample format {other}"
            ))),
        }?;

        stream
            .play()
            .map_err(|e| SinkError::DeviceUnavailable(format!("failed to start stream: {e}")))?;

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            device_rate = config.sample_rate.0,
            channels = config.channels,
            format = %sample_format,
            source_rate = self.sample_rate,
            "audio device opened"
        );

        self.output = Some(Output {
            stream,
            producer,
            capacity: self.ring_capacity,
            device_lost,
        });
        Ok(())
    }

    fn write(&mut self, buffer: &[i8], offset: usize, length: usize) -> Result<usize, SinkError> {
        let output = self.output.as_mut().ok_or(SinkError::NotOpen)?;
        let mut remaining = window(buffer, offset, length)?;

        while !remaining.is_empty() {
            wait_until(&self.cancel, WRITE_BACKOFF, STALL_TIMEOUT, || {
                output.check()?;
                Ok(output.producer.slots() > 0)
            })?;

            let n = output.producer.slots().min(remaining.len());
            let chunk = output
                .producer
                .write_chunk_uninit(n)
                .map_err(|e| SinkError::Stream(e.to_string()))?;
            chunk.fill_from_iter(remaining[..n].iter().copied());
            remaining = &remaining[n..];
        }

        Ok(length)
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        let timeout = self.drain_timeout();
        let output = self.output.as_ref().ok_or(SinkError::NotOpen)?;
        wait_until(&self.cancel, DRAIN_POLL, timeout, || {
            output.check()?;
            Ok(output.producer.slots() >= output.capacity)
        })?;
        thread::sleep(DEVICE_LATENCY);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(output) = self.output.take() {
            if let Err(err) = output.stream.pause() {
                tracing::debug!(%err, "failed to pause stream on close");
            }
            tracing::debug!("audio device closed");
        }
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Poll `ready` every `poll` until it returns true.
///
/// Gives up with [`SinkError::Interrupted`] once `cancel` fires, or with
/// [`SinkError::Stalled`] after `timeout`. A condition that is already met
/// wins over both.
fn wait_until(
    cancel: &CancellationToken,
    poll: Duration,
    timeout: Duration,
    mut ready: impl FnMut() -> Result<bool, SinkError>,
) -> Result<(), SinkError> {
    let deadline = Instant::now() + timeout;
    loop {
        if ready()? {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(SinkError::Interrupted);
        }
        if Instant::now() >= deadline {
            return Err(SinkError::Stalled(timeout));
        }
        thread::sleep(poll);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut consumer: Consumer<i8>,
    source_rate: u32,
    device_lost: &Arc<AtomicBool>,
) -> Result<cpal::Stream, SinkError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut hold = SampleHold::new(source_rate, config.sample_rate.0);
    let device_lost = Arc::clone(device_lost);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Mono source duplicated to every channel
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(hold.next_sample(|| consumer.pop().ok()));
                    frame.fill(value);
                }
            },
            move |err| {
                tracing::error!(%err, "audio stream error");
                if matches!(err, cpal::StreamError::DeviceNotAvailable) {
                    device_lost.store(true, Ordering::Release);
                }
            },
            None,
        )
        .map_err(|e| SinkError::DeviceUnavailable(format!("failed to build output stream: {e}")))
}
