//! 核心宏定义

/// 为配置结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use particle_engine::impl_default;
///
/// struct ClockConfig {
///     fixed_dt: f32,
///     max_steps: u32,
/// }
///
/// impl_default!(ClockConfig {
///     fixed_dt: 1.0 / 60.0,
///     max_steps: 8,
/// });
///
/// assert_eq!(ClockConfig::default().max_steps, 8);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct Budget {
        capacity: usize,
        label: String,
    }

    impl_default!(Budget {
        capacity: 64,
        label: "sparks".to_string(),
    });

    #[test]
    fn test_impl_default() {
        let budget = Budget::default();
        assert_eq!(budget.capacity, 64);
        assert_eq!(budget.label, "sparks");
    }
}
