//! 固定容量粒子池
//!
//! 所有粒子记录在构造时一次性分配，之后的发射与更新不再分配内存。
//!
//! 槽位生命周期：
//!
//! ```text
//! Free ──claim──▶ Live ──retire──▶ Retired ──reclaim──▶ Free
//! ```
//!
//! 过期粒子先进入 Retired 状态，在下一次找不到空闲槽位的发射请求时才被回收。

use super::particle::Particle;
use std::collections::VecDeque;

/// 槽位状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Free,
    Live,
    Retired,
}

/// 粒子池
#[derive(Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    states: Vec<SlotState>,
    /// 每个槽位最近一次被占用时的发射序号
    sequences: Vec<u64>,
    /// 空闲槽位栈（栈顶为最小索引）
    free: Vec<u32>,
    /// 按发射顺序记录的 (槽位, 序号)，过期或被覆盖的条目惰性跳过
    spawn_order: VecDeque<(u32, u64)>,
    next_sequence: u64,
    live_count: usize,
    retired_count: usize,
}

impl ParticlePool {
    /// 创建指定容量的粒子池
    ///
    /// 容量应已通过设置校验（大于零且不超过 `u32::MAX`）。
    pub fn new(capacity: usize) -> Self {
        debug_assert!(
            u32::try_from(capacity).is_ok(),
            "particle pool capacity {} does not fit in u32",
            capacity
        );

        Self {
            particles: vec![Particle::default(); capacity],
            states: vec![SlotState::Free; capacity],
            sequences: vec![0; capacity],
            free: (0..capacity as u32).rev().collect(),
            spawn_order: VecDeque::with_capacity(capacity * 2 + 1),
            next_sequence: 0,
            live_count: 0,
            retired_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// 存活粒子数
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// 已过期、等待回收的粒子数
    pub fn retired_count(&self) -> usize {
        self.retired_count
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.live_count == self.capacity()
    }

    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.states.get(index).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// 占用一个空闲槽位
    ///
    /// 没有空闲槽位时先回收所有 Retired 槽位；仍然没有则返回 `None`。
    pub fn claim(&mut self) -> Option<usize> {
        if self.free.is_empty() && self.retired_count > 0 {
            self.reclaim_retired();
        }

        let index = self.free.pop()? as usize;
        self.states[index] = SlotState::Live;
        self.live_count += 1;
        self.record_spawn(index);
        Some(index)
    }

    /// 重新占用最早发射的存活槽位，用于饱和时覆盖
    ///
    /// 均摊 O(1)：队首的失效条目只会被跳过一次。
    pub fn recycle_oldest(&mut self) -> Option<usize> {
        while let Some((index, sequence)) = self.spawn_order.pop_front() {
            if self.is_current(index as usize, sequence) {
                self.record_spawn(index as usize);
                return Some(index as usize);
            }
        }
        None
    }

    fn is_current(&self, index: usize, sequence: u64) -> bool {
        self.states[index] == SlotState::Live && self.sequences[index] == sequence
    }

    fn record_spawn(&mut self, index: usize) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.sequences[index] = sequence;

        // 失效条目过多时压缩，队列长度保持在 2 × capacity 以内
        if self.spawn_order.len() >= self.capacity() * 2 {
            let states = &self.states;
            let sequences = &self.sequences;
            self.spawn_order.retain(|&(i, seq)| {
                states[i as usize] == SlotState::Live && sequences[i as usize] == seq
            });
        }
        self.spawn_order.push_back((index as u32, sequence));
    }

    /// 将所有 Retired 槽位归还为空闲，返回回收数量
    pub fn reclaim_retired(&mut self) -> usize {
        let mut reclaimed = 0;
        for (index, state) in self.states.iter_mut().enumerate().rev() {
            if *state == SlotState::Retired {
                *state = SlotState::Free;
                self.free.push(index as u32);
                reclaimed += 1;
            }
        }
        self.retired_count -= reclaimed;
        reclaimed
    }

    /// 标记存活粒子为过期
    pub fn retire(&mut self, index: usize) -> bool {
        match self.states.get_mut(index) {
            Some(state) if *state == SlotState::Live => {
                *state = SlotState::Retired;
                self.live_count -= 1;
                self.retired_count += 1;
                true
            }
            _ => false,
        }
    }

    /// 最早发射的存活粒子的槽位（按发射序号）
    pub fn oldest_live(&self) -> Option<usize> {
        self.spawn_order
            .iter()
            .find(|&&(index, sequence)| self.is_current(index as usize, sequence))
            .map(|&(index, _)| index as usize)
    }

    /// 对每个存活粒子调用 `update`，返回 `false` 的粒子被标记为过期
    ///
    /// 返回本次过期的数量。
    pub fn update_live<F>(&mut self, mut update: F) -> usize
    where
        F: FnMut(&mut Particle) -> bool,
    {
        let mut retired = 0;
        for (particle, state) in self.particles.iter_mut().zip(self.states.iter_mut()) {
            if *state != SlotState::Live {
                continue;
            }
            if !update(particle) {
                *state = SlotState::Retired;
                retired += 1;
            }
        }
        self.live_count -= retired;
        self.retired_count += retired;
        retired
    }

    /// 按槽位顺序遍历存活粒子
    pub fn iter_live(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles
            .iter()
            .zip(&self.states)
            .filter(|(_, state)| **state == SlotState::Live)
            .map(|(particle, _)| particle)
    }

    /// 清空粒子池
    pub fn clear(&mut self) {
        self.states.fill(SlotState::Free);
        self.free.clear();
        self.free.extend((0..self.capacity() as u32).rev());
        self.spawn_order.clear();
        self.live_count = 0;
        self.retired_count = 0;
    }
}
