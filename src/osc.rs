use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

use crate::classify::ActionResult;
use crate::tracker::RepCounts;

/// オーバーレイ/読み上げプロセスのデフォルト受信アドレス
pub const COACH_DEFAULT_ADDR: &str = "127.0.0.1:39571";

/// 判定結果のOSCメッセージを構築
/// 引数: slot, action, confidence, squats, jumping_jacks
pub fn build_action_message(slot: i32, result: &ActionResult, counts: &RepCounts) -> OscMessage {
    OscMessage {
        addr: "/kamae/action".to_string(),
        args: vec![
            OscType::Int(slot),
            OscType::String(result.action.as_str().to_string()),
            OscType::Float(result.confidence),
            OscType::Int(counts.squats as i32),
            OscType::Int(counts.jumping_jacks as i32),
        ],
    }
}

/// OSCメッセージをバイト列にエンコード
pub fn encode_osc_message(msg: &OscMessage) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(msg.clone());
    let encoded = encoder::encode(&packet)?;
    Ok(encoded)
}

/// 判定結果をUDPで送る薄いクライアント
pub struct CoachClient {
    socket: UdpSocket,
    target_addr: String,
}

impl CoachClient {
    pub fn new(target_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target_addr: target_addr.to_string(),
        })
    }

    /// デフォルトアドレス(127.0.0.1:39571)で作成
    pub fn default_addr() -> Result<Self> {
        Self::new(COACH_DEFAULT_ADDR)
    }

    /// 1スロット分の判定結果と回数を送信
    pub fn send(&self, slot: i32, result: &ActionResult, counts: &RepCounts) -> Result<()> {
        let msg = build_action_message(slot, result, counts);
        let data = encode_osc_message(&msg)?;
        self.socket.send_to(&data, &self.target_addr)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Action;

    #[test]
    fn test_message_address() {
        let result = ActionResult::new(Action::Squatting, 0.9);
        let msg = build_action_message(0, &result, &RepCounts::default());
        assert_eq!(msg.addr, "/kamae/action");
    }

    #[test]
    fn test_message_args() {
        let result = ActionResult::new(Action::JumpingJack, 0.85);
        let counts = RepCounts {
            squats: 3,
            jumping_jacks: 7,
        };
        let msg = build_action_message(1, &result, &counts);

        // 引数: slot, action, confidence, squats, jumping_jacks
        assert_eq!(msg.args.len(), 5);
        assert_eq!(msg.args[0], OscType::Int(1));
        assert_eq!(msg.args[1], OscType::String("jumping_jack".to_string()));
        assert_eq!(msg.args[2], OscType::Float(0.85));
        assert_eq!(msg.args[3], OscType::Int(3));
        assert_eq!(msg.args[4], OscType::Int(7));
    }

    #[test]
    fn test_encode_message() {
        let result = ActionResult::new(Action::Standing, 0.9);
        let msg = build_action_message(0, &result, &RepCounts::default());
        let encoded = encode_osc_message(&msg).unwrap();
        assert!(!encoded.is_empty());
    }
}
