/*
 *  scheduler.rs
 *
 *  spotlcd - now playing, one line at a time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Periodic render and button sampling loops
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::{sync::Arc, time::Duration};
use log::{debug, error, warn};
use tokio::sync::{mpsc, Mutex as TokMutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::display::{play_frame, DisplayDevice, Renderer};
use crate::input::{ButtonId, ButtonPins, Debouncer, Dispatcher, PinReader};
use crate::player::{MediaSource, PlayerStatus};

/// A running periodic task and the means to stop it.
pub struct LoopHandle {
    name: &'static str,
    stop_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl LoopHandle {
    /// Ask the loop to exit after its current tick and wait for it.
    pub async fn stop(self) {
        // a closed channel means the loop is already gone
        let _ = self.stop_tx.send(()).await;
        if let Err(e) = self.join.await {
            error!("{} loop ended badly: {}", self.name, e);
        }
    }
}

/// One status refresh: query the player, build the frame, draw it.
///
/// A failed query is logged and shown as the fallback text. The media source
/// is released before drawing so button commands are not held up by the
/// progress bar pauses. The display stays locked for the whole frame.
pub async fn render_tick<M, D>(
    media: &TokMutex<M>,
    renderer: &mut Renderer,
    display: &TokMutex<D>,
) -> PlayerStatus
where
    M: MediaSource,
    D: DisplayDevice + ?Sized,
{
    let result = media.lock().await.query().await;
    if let Err(e) = &result {
        warn!("player status unavailable: {}", e);
    }
    let status = PlayerStatus::from(result);

    let frame = renderer.render(&status);
    debug!(
        "frame of {} ops over {:?}, title offset now {}",
        frame.ops().len(),
        frame.duration(),
        renderer.cursor().offset()
    );
    let mut display = display.lock().await;
    if let Err(e) = play_frame(&mut *display, &frame).await {
        error!("display update failed: {}", e);
    }
    status
}

/// One pass over the buttons. Returns how many presses were dispatched.
///
/// Pins are read in button order and each new press runs its command before
/// the next pin is read. A pin that cannot be read is skipped this pass.
pub async fn sample_tick<P, M>(
    pins: &mut P,
    pin_map: &ButtonPins,
    debouncer: &mut Debouncer,
    dispatcher: &Dispatcher<M>,
) -> usize
where
    P: PinReader + ?Sized,
    M: MediaSource,
{
    let mut fired = 0;
    for button in ButtonId::ALL {
        let pin = pin_map.pin(button);
        let level = match pins.read_level(pin) {
            Ok(level) => level,
            Err(e) => {
                debug!("skipping {} this pass: {}", button, e);
                continue;
            }
        };
        if debouncer.update(button, level) {
            debug!(
                "{} pressed on GPIO {} (level {}, {:?})",
                button,
                pin,
                debouncer.state(button).last_raw_level,
                debouncer.polarity()
            );
            dispatcher.fire(button).await;
            fired += 1;
        }
    }
    fired
}

/// Refresh the display every `period`, starting immediately.
pub fn spawn_render_loop<M, D>(
    media: Arc<TokMutex<M>>,
    display: Arc<TokMutex<D>>,
    mut renderer: Renderer,
    period: Duration,
) -> LoopHandle
where
    M: MediaSource + 'static,
    D: DisplayDevice + ?Sized + 'static,
{
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    let join = tokio::spawn(async move {
        let mut interval = time::interval(period);
        // a long frame pushes the next tick back rather than bunching them up
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    render_tick(&media, &mut renderer, &display).await;
                }
                _ = stop_rx.recv() => {
                    debug!("render loop stopping");
                    break;
                }
            }
        }
    });
    LoopHandle { name: "render", stop_tx, join }
}

/// Sample the buttons every `period`.
pub fn spawn_sampling_loop<P, M>(
    mut pins: P,
    pin_map: ButtonPins,
    mut debouncer: Debouncer,
    dispatcher: Dispatcher<M>,
    period: Duration,
) -> LoopHandle
where
    P: PinReader + 'static,
    M: MediaSource + 'static,
{
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    let join = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    sample_tick(&mut pins, &pin_map, &mut debouncer, &dispatcher).await;
                }
                _ = stop_rx.recv() => {
                    debug!("sampling loop stopping");
                    break;
                }
            }
        }
    });
    LoopHandle { name: "sampling", stop_tx, join }
}
