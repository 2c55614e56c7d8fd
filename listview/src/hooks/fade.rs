use std::time::Duration;

use listdom::{Fragment, TransitionConfig};
use log::trace;
use tokio::time::{Instant, MissedTickBehavior, interval};

/// Interval between opacity updates while fading.
const FRAME: Duration = Duration::from_millis(16);

/// Animate `fragment`'s opacity to `target`.
///
/// Uses the element's own opacity transition when it has one, `transition`
/// otherwise. Resolves once the target opacity has been set, or as soon as a
/// newer animation takes the fragment over; the newer one starts from
/// whatever opacity this one reached.
pub async fn fade_to(fragment: Fragment, target: f32, transition: TransitionConfig) {
    let token = fragment.begin_animation();
    let (from, transition) =
        fragment.read(|el| (el.style.opacity, el.transitions.opacity.unwrap_or(transition)));

    if transition.duration.is_zero() || from == target {
        fragment.set_opacity(target);
        return;
    }

    trace!("fade {} {from} -> {target} over {:?}", fragment.id(), transition.duration);
    let start = Instant::now();
    let mut frames = interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        frames.tick().await;
        if !fragment.owns_animation(token) {
            trace!("fade {} superseded", fragment.id());
            return;
        }
        let progress = transition.progress(start.elapsed());
        fragment.set_opacity(from + (target - from) * progress);
        if progress >= 1.0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use listdom::{Easing, Element, Transitions};

    use super::*;

    fn linear(ms: u64) -> TransitionConfig {
        TransitionConfig::new(Duration::from_millis(ms), Easing::Linear)
    }

    #[tokio::test(start_paused = true)]
    async fn fades_over_the_transition_duration() {
        let fragment = Fragment::new(Element::li().opacity(0.0));
        let start = Instant::now();

        fade_to(fragment.clone(), 1.0, linear(400)).await;

        assert_eq!(fragment.opacity(), 1.0);
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn opacity_moves_towards_target_midway() {
        let fragment = Fragment::new(Element::li());
        let handle = tokio::spawn(fade_to(fragment.clone(), 0.0, linear(400)));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let midway = fragment.opacity();
        handle.await.unwrap();

        assert!(midway > 0.0 && midway < 1.0, "midway opacity was {midway}");
        assert_eq!(fragment.opacity(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_fade_takes_over() {
        let fragment = Fragment::new(Element::li().opacity(0.0));
        let fade_in = tokio::spawn(fade_to(fragment.clone(), 1.0, linear(400)));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let fade_out = tokio::spawn(fade_to(fragment.clone(), 0.0, linear(400)));
        let mut last = fragment.opacity();
        while !fade_out.is_finished() {
            tokio::time::sleep(Duration::from_millis(8)).await;
            let opacity = fragment.opacity();
            assert!(opacity <= last, "opacity rose from {last} to {opacity}");
            last = opacity;
        }

        fade_in.await.unwrap();
        assert_eq!(fragment.opacity(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn element_transition_overrides_default() {
        let fragment = Fragment::new(
            Element::li()
                .opacity(0.0)
                .transitions(Transitions::new().opacity(Duration::ZERO, Easing::Linear)),
        );
        let start = Instant::now();

        fade_to(fragment.clone(), 1.0, linear(10_000)).await;

        assert_eq!(fragment.opacity(), 1.0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
