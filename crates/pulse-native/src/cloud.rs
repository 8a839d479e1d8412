use glam::Vec3;

/// Synthetic point cloud standing in for a loaded avatar: elements spread
/// on a Fibonacci sphere, each with an isotropic covariance record.
pub struct PointCloud {
    pub base: Vec<f32>,
    pub centers: Vec<f32>,
    pub live: Vec<f32>,
}

impl PointCloud {
    pub fn sphere(count: usize, radius: f32, splat_size: f32) -> Self {
        let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        let variance = splat_size * splat_size;
        let mut base = Vec::with_capacity(count * 6);
        let mut centers = Vec::with_capacity(count * 3);
        for i in 0..count {
            let y = if count > 1 {
                1.0 - 2.0 * i as f32 / (count - 1) as f32
            } else {
                0.0
            };
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            let p = Vec3::new(theta.cos() * r, y, theta.sin() * r) * radius;
            centers.extend_from_slice(&p.to_array());
            // xx, xy, xz, yy, yz, zz
            base.extend_from_slice(&[variance, 0.0, 0.0, variance, 0.0, variance]);
        }
        let live = base.clone();
        Self {
            base,
            centers,
            live,
        }
    }

    pub fn len(&self) -> usize {
        self.centers.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Mean of the live diagonal relative to base; 1.0 means undeformed.
    pub fn mean_scale(&self) -> f32 {
        let (sum, n) = self
            .base
            .chunks_exact(6)
            .zip(self.live.chunks_exact(6))
            .flat_map(|(b, l)| [0, 3, 5].map(|k| (b[k], l[k])))
            .filter(|&(b, _)| b != 0.0)
            .fold((0.0f32, 0usize), |(s, n), (b, l)| (s + l / b, n + 1));
        if n == 0 {
            1.0
        } else {
            sum / n as f32
        }
    }
}
