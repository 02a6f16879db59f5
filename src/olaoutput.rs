use std::{
    cell::RefCell,
    net::{SocketAddr, UdpSocket},
    rc::Rc,
    str::FromStr,
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::light::Light;

pub const UNIVERSE_SIZE: usize = 512;

/// One DMX universe, sent to OLA's OSC plugin as a single blob.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    addr: String,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr, universe: u16) -> Result<Self, String> {
        let our_addr = match SocketAddr::from_str("0.0.0.0:0") {
            Ok(addr) => addr,
            Err(error) => return Err(error.to_string()),
        };
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        Ok(OlaOutput {
            sock,
            target_addr,
            addr: format!("/dmx/universe/{universe}"),
            buffer: vec![0; UNIVERSE_SIZE],
        })
    }

    /// Sets a 1-based DMX channel. Channels outside the universe are ignored.
    pub fn set(&mut self, channel: u16, value: u8) {
        if let Some(slot) = Self::slot(channel) {
            self.buffer[slot] = value;
        }
    }

    pub fn get(&self, channel: u16) -> Option<u8> {
        Self::slot(channel).map(|slot| self.buffer[slot])
    }

    fn slot(channel: u16) -> Option<usize> {
        let channel = channel as usize;
        if (1..=UNIVERSE_SIZE).contains(&channel) {
            Some(channel - 1)
        } else {
            None
        }
    }

    pub fn flush(&mut self) -> Result<(), String> {
        let msg_buf = match encoder::encode(&OscPacket::Message(OscMessage {
            addr: self.addr.clone(),
            args: vec![OscType::Blob(Vec::clone(&self.buffer))],
        })) {
            Ok(msg_buf) => msg_buf,
            Err(error) => return Err(format!("{:?}", error)),
        };

        match self.sock.send_to(&msg_buf, self.target_addr) {
            Ok(_) => Ok(()),
            Err(error) => Err(format!("Cannot send to {}: {}", self.target_addr, error)),
        }
    }

    pub fn blackout(&mut self) {
        for value in self.buffer.iter_mut() {
            *value = 0;
        }
    }
}

pub struct DmxLight {
    output: Rc<RefCell<OlaOutput>>,
    channel: u16,
    level: f64,
    patched: bool,
}

impl DmxLight {
    /// Patches the channel and writes its initial level (0..=255).
    pub fn new(output: Rc<RefCell<OlaOutput>>, channel: u16, level: f64) -> DmxLight {
        let mut light = DmxLight {
            output,
            channel,
            level: 0.0,
            patched: true,
        };
        light.set_brightness(level);
        light
    }

    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// Takes the light out of the rig; flickering stops on the next tick.
    pub fn unpatch(&mut self) {
        self.patched = false;
    }
}

impl Light for DmxLight {
    fn brightness(&self) -> f64 {
        self.level
    }

    fn set_brightness(&mut self, brightness: f64) {
        self.level = brightness.clamp(0.0, 255.0);
        self.output
            .borrow_mut()
            .set(self.channel, self.level.round() as u8);
    }

    fn is_live(&self) -> bool {
        self.patched && OlaOutput::slot(self.channel).is_some()
    }

    fn label(&self) -> String {
        format!("channel {}", self.channel)
    }
}
