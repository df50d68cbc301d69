/// 固定步长模拟时钟
///
/// 将帧时间累积为若干个固定步长。单帧步数达到上限时丢弃剩余时间，
/// 避免卡顿后连续追帧。
#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    fixed_dt_seconds: f32,
    max_steps: u32,
    accumulator_seconds: f32,
}

impl SimulationClock {
    pub fn new(fixed_dt_seconds: f32, max_steps: u32) -> Self {
        Self {
            fixed_dt_seconds,
            max_steps: max_steps.max(1),
            accumulator_seconds: 0.0,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt_seconds
    }

    /// 累积帧时间并返回本帧应执行的固定步数
    pub fn consume_steps(&mut self, frame_dt_seconds: f32) -> u32 {
        if frame_dt_seconds.is_finite() {
            self.accumulator_seconds += frame_dt_seconds.max(0.0);
        }

        let mut steps = 0u32;
        while self.accumulator_seconds >= self.fixed_dt_seconds {
            self.accumulator_seconds -= self.fixed_dt_seconds;
            steps += 1;
            if steps >= self.max_steps {
                self.accumulator_seconds = 0.0;
                break;
            }
        }
        steps
    }

    /// 未消耗的累积时间占一个步长的比例，可用于渲染插值
    pub fn alpha(&self) -> f32 {
        (self.accumulator_seconds / self.fixed_dt_seconds).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationClock;

    #[test]
    fn fixed_clock_caps_steps() {
        let mut clock = SimulationClock::new(1.0 / 120.0, 8);
        let steps = clock.consume_steps(0.5);
        assert_eq!(steps, 8);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn fixed_clock_carries_remainder() {
        let mut clock = SimulationClock::new(0.25, 8);
        assert_eq!(clock.consume_steps(0.375), 1);
        assert_eq!(clock.alpha(), 0.5);
        assert_eq!(clock.consume_steps(0.125), 1);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn fixed_clock_ignores_negative_frames() {
        let mut clock = SimulationClock::new(0.1, 4);
        assert_eq!(clock.consume_steps(-1.0), 0);
        assert_eq!(clock.consume_steps(f32::NAN), 0);
    }
}
