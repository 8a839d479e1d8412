use web_sys as web;

/// Byte snapshots read from an `AnalyserNode` once per tick.
pub struct AnalyserTap {
    node: web::AnalyserNode,
    sample_rate: f32,
    spectrum: Vec<u8>,
    waveform: Vec<u8>,
}

impl AnalyserTap {
    pub fn new(node: web::AnalyserNode, sample_rate: f32) -> Self {
        let bins = node.frequency_bin_count() as usize;
        let samples = node.fft_size() as usize;
        log::info!(
            "[audio] analyser attached bins={} fft={} rate={}",
            bins,
            samples,
            sample_rate
        );
        Self {
            node,
            sample_rate,
            spectrum: vec![0; bins],
            waveform: vec![0; samples],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Refresh both buffers from the node and borrow them.
    pub fn read(&mut self) -> (&[u8], &[u8]) {
        self.node.get_byte_frequency_data(&mut self.spectrum);
        self.node.get_byte_time_domain_data(&mut self.waveform);
        (&self.spectrum, &self.waveform)
    }
}
