use domain::decoder::FrameDecoder;
use domain::error::DecodeError;
use domain::scale::{ProtocolVariant, RawFrame, StabilityCode, WeightReading};

// --- Decoders ---

/// `<stability> <status> <weight>`, e.g. `2 XXXXXXX 543.21\r`.
///
/// Only stability `2` yields a weight. The status field is ignored.
#[derive(Debug, Default)]
pub struct FibraDecoder;

impl FibraDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameDecoder for FibraDecoder {
    fn variant(&self) -> ProtocolVariant {
        ProtocolVariant::Fibra
    }

    fn parse(&self, frame: &RawFrame) -> Result<f64, DecodeError> {
        if frame.is_empty() {
            return Err(DecodeError::Empty);
        }

        let tokens: Vec<&[u8]> = frame.tokens().collect();
        let (stability, weight) = match tokens.as_slice() {
            [stability, _status, weight] => (*stability, *weight),
            other => {
                return Err(DecodeError::TokenCount {
                    expected: 3,
                    found: other.len(),
                });
            }
        };

        let code = StabilityCode::from_token(stability).ok_or_else(|| {
            DecodeError::UnknownStability(String::from_utf8_lossy(stability).into_owned())
        })?;
        if !code.is_stable() {
            return Err(DecodeError::NotStable(code));
        }

        let token = std::str::from_utf8(weight)
            .map_err(|_| DecodeError::InvalidNumber(String::from_utf8_lossy(weight).into_owned()))?;
        parse_weight(token)
    }
}

/// Bare weight with a comma decimal separator, e.g. `123,45`.
///
/// The display reports no stability, any numeric first token is the weight.
#[derive(Debug, Default)]
pub struct GeotextilDecoder;

impl GeotextilDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameDecoder for GeotextilDecoder {
    fn variant(&self) -> ProtocolVariant {
        ProtocolVariant::Geotextil
    }

    fn parse(&self, frame: &RawFrame) -> Result<f64, DecodeError> {
        let text = std::str::from_utf8(frame.as_bytes()).map_err(|_| DecodeError::NotText)?;
        let token = text.split_whitespace().next().ok_or(DecodeError::Empty)?;
        parse_weight(&token.replace(',', "."))
    }
}

fn parse_weight(token: &str) -> Result<f64, DecodeError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber(token.to_string()))
}

// --- Factory ---

pub struct DecoderFactory;

impl DecoderFactory {
    pub fn create(variant: ProtocolVariant) -> Box<dyn FrameDecoder> {
        match variant {
            ProtocolVariant::Fibra => Box::new(FibraDecoder::new()),
            ProtocolVariant::Geotextil => Box::new(GeotextilDecoder::new()),
        }
    }
}

/// Decode `frame` under `variant`. Every failure, unstable and null readings
/// included, is "no value".
pub fn decode(frame: &RawFrame, variant: ProtocolVariant) -> WeightReading {
    decode_with(DecoderFactory::create(variant).as_ref(), frame)
}

pub fn decode_with(decoder: &dyn FrameDecoder, frame: &RawFrame) -> WeightReading {
    match decoder.parse(frame) {
        Ok(weight) => Some(weight),
        Err(reason) => {
            tracing::debug!(
                variant = %decoder.variant(),
                frame = %frame,
                %reason,
                "Frame yields no weight"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_matches_variant() {
        assert_eq!(
            DecoderFactory::create(ProtocolVariant::Fibra).variant(),
            ProtocolVariant::Fibra
        );
        assert_eq!(
            DecoderFactory::create(ProtocolVariant::Geotextil).variant(),
            ProtocolVariant::Geotextil
        );
    }

    #[test]
    fn test_fibra_reports_reason() {
        let decoder = FibraDecoder::new();
        assert_eq!(
            decoder.parse(&RawFrame::from("0 XXXXXXX 543.21")),
            Err(DecodeError::NotStable(StabilityCode::Unstable))
        );
        assert_eq!(
            decoder.parse(&RawFrame::from("2 543.21")),
            Err(DecodeError::TokenCount {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            decoder.parse(&RawFrame::from("7 X 1.0")),
            Err(DecodeError::UnknownStability("7".to_string()))
        );
        assert_eq!(decoder.parse(&RawFrame::empty()), Err(DecodeError::Empty));
    }

    #[test]
    fn test_geotextil_reports_reason() {
        let decoder = GeotextilDecoder::new();
        assert_eq!(
            decoder.parse(&RawFrame::from(&[0xff, 0xfe, b'1'][..])),
            Err(DecodeError::NotText)
        );
        assert_eq!(decoder.parse(&RawFrame::from("  \r\n")), Err(DecodeError::Empty));
        assert_eq!(
            decoder.parse(&RawFrame::from("kg 12")),
            Err(DecodeError::InvalidNumber("kg".to_string()))
        );
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        assert_eq!(parse_weight("inf"), Err(DecodeError::InvalidNumber("inf".to_string())));
        assert!(parse_weight("NaN").is_err());
        assert_eq!(parse_weight("-0.25"), Ok(-0.25));
    }
}
