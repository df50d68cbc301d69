//! 粒子数据结构

use glam::{Vec3, Vec4};

/// 粒子记录
///
/// 由粒子池持有，不单独分配。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// 发射位置
    pub spawn_position: Vec3,
    /// 当前位置
    pub position: Vec3,
    /// 初始速度
    pub initial_velocity: Vec3,
    /// 当前速度
    pub velocity: Vec3,
    /// 加速度（发射时确定）
    pub acceleration: Vec3,
    /// 发射时间（模拟时钟）
    pub spawn_time: f32,
    /// 当前年龄
    pub age: f32,
    /// 生命周期
    pub lifetime: f32,
    /// 每粒子随机值，驱动视觉差异
    pub random: Vec4,
    /// 旋转
    pub rotation: f32,
    /// 旋转速度
    pub rotation_speed: f32,
    /// 初始大小
    pub start_size: f32,
    /// 结束大小
    pub end_size: f32,
    /// 初始颜色
    pub start_color: Vec4,
    /// 结束颜色
    pub end_color: Vec4,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::ZERO,
            position: Vec3::ZERO,
            initial_velocity: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            spawn_time: 0.0,
            age: 0.0,
            lifetime: 0.0,
            random: Vec4::ZERO,
            rotation: 0.0,
            rotation_speed: 0.0,
            start_size: 1.0,
            end_size: 1.0,
            start_color: Vec4::ONE,
            end_color: Vec4::ONE,
        }
    }
}

impl Particle {
    /// 归一化年龄（0-1）
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// 生成只读视图
    pub fn view(&self) -> ParticleView {
        let t = self.normalized_age();
        ParticleView {
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            size: self.start_size + (self.end_size - self.start_size) * t,
            color: self.start_color.lerp(self.end_color, t),
            age: self.age,
            lifetime: self.lifetime,
            normalized_age: t,
            random: self.random,
        }
    }
}

/// 提供给渲染器的粒子视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: f32,
    /// 按年龄插值后的大小
    pub size: f32,
    /// 按年龄插值后的颜色
    pub color: Vec4,
    pub age: f32,
    pub lifetime: f32,
    pub normalized_age: f32,
    pub random: Vec4,
}

impl ParticleView {
    /// 转换为顶点数据
    pub fn to_vertex(&self) -> ParticleVertex {
        ParticleVertex {
            position: self.position.to_array(),
            size: self.size,
            color: self.color.to_array(),
            rotation: self.rotation,
            normalized_age: self.normalized_age,
            _padding: [0.0; 2],
        }
    }
}

/// GPU 顶点结构（point sprite / billboard）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    /// 位置
    pub position: [f32; 3],
    /// 大小
    pub size: f32,
    /// 颜色
    pub color: [f32; 4],
    /// 旋转
    pub rotation: f32,
    /// 归一化年龄
    pub normalized_age: f32,
    /// 填充
    pub _padding: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_interpolates_size_and_color() {
        let particle = Particle {
            age: 1.0,
            lifetime: 2.0,
            start_size: 2.0,
            end_size: 4.0,
            start_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            end_color: Vec4::new(1.0, 1.0, 1.0, 0.0),
            ..Default::default()
        };

        let view = particle.view();
        assert!((view.normalized_age - 0.5).abs() < 0.001);
        assert!((view.size - 3.0).abs() < 0.001);
        assert!((view.color.w - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 48);
        let vertex = Particle::default().view().to_vertex();
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 48);
    }
}
