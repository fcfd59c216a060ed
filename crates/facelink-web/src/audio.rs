//! WebAudio feedback: a short noise-plus-tone burst when a link lands and a
//! low sawtooth stab when no pair is available.
//!
//! The bank is built on the first user gesture. If anything here fails the
//! error is logged and the app keeps running silently; callers hold an
//! `Option<SoundBank>` and skip triggers while it is `None`.

use web_sys as web;

pub struct SoundBank {
    ctx: web::AudioContext,
    master: web::GainNode,
    noise_buf: web::AudioBuffer,
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, ()> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(())
        }
    }
}

// One second of xorshift white noise, enough for a burst source.
fn build_noise_buffer(audio_ctx: &web::AudioContext) -> Result<web::AudioBuffer, ()> {
    let sr = audio_ctx.sample_rate();
    let len = sr as u32;
    let buf = audio_ctx.create_buffer(1, len, sr).map_err(|e| {
        log::error!("noise buffer error: {:?}", e);
    })?;
    let mut seed: u32 = 0x1234_ABCD;
    let mut data: Vec<f32> = vec![0.0; len as usize];
    for v in data.iter_mut() {
        let mut x = seed;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        seed = x;
        *v = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
    }
    let _ = buf.copy_to_channel(&mut data, 0);
    Ok(buf)
}

/// Piecewise-linear gain envelope: silence at `t0`, then a ramp to each
/// `(offset_sec, level)` point in order.
fn ramp_envelope(gain: &web::GainNode, t0: f64, points: &[(f64, f32)]) {
    let _ = gain.gain().set_value_at_time(0.0, t0);
    for &(dt, level) in points {
        let _ = gain.gain().linear_ramp_to_value_at_time(level, t0 + dt);
    }
}

impl SoundBank {
    /// Must be called from a user gesture so the context may start.
    pub fn new() -> Result<Self, ()> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {:?}", e);
        })?;
        let _ = ctx.resume();
        let master = create_gain(&ctx, 0.5, "master")?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| {
                log::error!("master connect error: {:?}", e);
            })?;
        let noise_buf = build_noise_buffer(&ctx)?;
        log::info!("sound bank ready");
        Ok(Self {
            ctx,
            master,
            noise_buf,
        })
    }

    /// Noise burst plus a sine at the chosen note.
    pub fn play_link(&self, note_hz: f32) {
        let now = self.ctx.current_time();

        if let (Ok(src), Ok(gain)) = (
            web::AudioBufferSourceNode::new(&self.ctx),
            web::GainNode::new(&self.ctx),
        ) {
            src.set_buffer(Some(&self.noise_buf));
            ramp_envelope(&gain, now, &[(0.01, 0.4), (0.11, 0.0)]);
            let _ = src.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(&self.master);
            let _ = src.start_with_when(now);
            let _ = src.stop_with_when(now + 0.3);
        }

        if let (Ok(osc), Ok(gain)) = (
            web::OscillatorNode::new(&self.ctx),
            web::GainNode::new(&self.ctx),
        ) {
            osc.set_type(web::OscillatorType::Sine);
            osc.frequency().set_value(note_hz);
            // attack to 0.5, decay to a low sustain, then release
            ramp_envelope(&gain, now, &[(0.01, 0.5), (0.21, 0.05), (0.51, 0.0)]);
            let _ = osc.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(&self.master);
            let _ = osc.start_with_when(now);
            let _ = osc.stop_with_when(now + 0.6);
        }
    }

    /// Low sawtooth stab for a failed link attempt.
    pub fn play_failure(&self) {
        let now = self.ctx.current_time();
        if let (Ok(osc), Ok(gain)) = (
            web::OscillatorNode::new(&self.ctx),
            web::GainNode::new(&self.ctx),
        ) {
            osc.set_type(web::OscillatorType::Sawtooth);
            osc.frequency().set_value(60.0);
            ramp_envelope(&gain, now, &[(0.01, 0.3), (0.06, 0.0)]);
            let _ = osc.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(&self.master);
            let _ = osc.start_with_when(now);
            let _ = osc.stop_with_when(now + 0.2);
        }
    }
}
