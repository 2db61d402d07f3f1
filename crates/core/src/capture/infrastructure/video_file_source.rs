use std::path::Path;

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::{Frame, RGB_CHANNELS};

/// Decodes a video file with ffmpeg-next and yields RGB24 frames.
///
/// The end of the file is the end of the stream; decoding errors on
/// individual packets are skipped.
pub struct VideoFileSource {
    state: Option<DecodeState>,
    frame_index: usize,
}

struct DecodeState {
    input: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    flushing: bool,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let input = ffmpeg_next::format::input(path)?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| CaptureError::NoVideoStream(path.to_path_buf()))?;
        let stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;
        let (width, height) = (decoder.width(), decoder.height());

        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        log::info!("Opened {} ({width}x{height})", path.display());

        Ok(Self {
            state: Some(DecodeState {
                input,
                decoder,
                scaler,
                stream_index,
                width,
                height,
                flushing: false,
            }),
            frame_index: 0,
        })
    }
}

impl DecodeState {
    fn receive(&mut self) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error>> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb = Video::empty();
        self.scaler.run(&decoded, &mut rgb)?;
        Ok(Some(packed_rgb(&rgb, self.width, self.height)))
    }

    fn next_pixels(&mut self) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error>> {
        loop {
            if let Some(pixels) = self.receive()? {
                return Ok(Some(pixels));
            }
            if self.flushing {
                return Ok(None);
            }

            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() == self.stream_index {
                        if let Err(e) = self.decoder.send_packet(&packet) {
                            log::debug!("Skipping undecodable packet: {e}");
                        }
                    }
                }
                None => {
                    // Drain frames still buffered in the decoder.
                    let _ = self.decoder.send_eof();
                    self.flushing = true;
                }
            }
        }
    }
}

impl FrameSource for VideoFileSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };
        let Some(pixels) = state.next_pixels()? else {
            return Ok(None);
        };
        let frame = Frame::new(pixels, state.width, state.height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Closed video after {} frames", self.frame_index);
        }
    }
}

/// Strips per-row stride padding from an ffmpeg RGB24 frame.
fn packed_rgb(rgb: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let row_len = width as usize * RGB_CHANNELS;
    let data = rgb.data(0);

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_len]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_video(path: &Path, num_frames: usize, width: u32, height: u32) {
        ffmpeg_next::init().unwrap();
        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();
        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, 10));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(10, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }
        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(0).unwrap().time_base();

        let mut to_yuv = scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .unwrap();

        let write_packets = |encoder: &mut ffmpeg_next::encoder::Video,
                                 octx: &mut ffmpeg_next::format::context::Output| {
            let mut packet = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut packet).is_ok() {
                packet.set_stream(0);
                packet.rescale_ts(ffmpeg_next::Rational(1, 10), ost_time_base);
                packet.write_interleaved(octx).unwrap();
            }
        };

        for i in 0..num_frames {
            let mut rgb = Video::new(ffmpeg_next::format::Pixel::RGB24, width, height);
            let stride = rgb.stride(0);
            let shade = (i * 40 % 256) as u8;
            for row in 0..height as usize {
                let line = &mut rgb.data_mut(0)[row * stride..row * stride + width as usize * 3];
                line.fill(shade);
            }
            let mut yuv = Video::empty();
            to_yuv.run(&rgb, &mut yuv).unwrap();
            yuv.set_pts(Some(i as i64));
            encoder.send_frame(&yuv).unwrap();
            write_packets(&mut encoder, &mut octx);
        }
        encoder.send_eof().unwrap();
        write_packets(&mut encoder, &mut octx);
        octx.write_trailer().unwrap();
    }

    #[test]
    fn test_reads_every_frame_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        write_test_video(&path, 5, 64, 48);

        let mut source = VideoFileSource::open(&path).unwrap();
        let mut indices = Vec::new();
        while let Some(frame) = source.read().unwrap() {
            assert_eq!((frame.width(), frame.height()), (64, 48));
            assert_eq!(frame.data().len(), 64 * 48 * 3);
            indices.push(frame.index());
        }
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        assert!(VideoFileSource::open(Path::new("/nonexistent/clip.mp4")).is_err());
    }

    #[test]
    fn test_release_is_idempotent_and_ends_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        write_test_video(&path, 2, 32, 32);

        let mut source = VideoFileSource::open(&path).unwrap();
        source.release();
        source.release();
        assert!(source.read().unwrap().is_none());
    }
}
