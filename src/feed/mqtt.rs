use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};

use super::FeedSenders;
use crate::config::MqttConfig;
use crate::types::{Sample, SensorChannel};

fn qos_from_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}

/// Maps an incoming topic to the channel it feeds.
fn channel_for_topic(config: &MqttConfig, topic: &str) -> Option<SensorChannel> {
    if topic == config.topics.accelerometer {
        Some(SensorChannel::Accelerometer)
    } else if topic == config.topics.gyroscope {
        Some(SensorChannel::Gyroscope)
    } else {
        None
    }
}

/// Connection options without credentials.
///
/// No last will is set: the subscribed topics carry sample payloads only.
fn build_options(config: &MqttConfig, host: &str, port: u16) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id.clone(), host, port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive as u64));
    options
}

/// Subscribes to both channel topics and forwards every parsed sample until shutdown.
///
/// Broker host and port can be overridden with `MQTT_HOST`/`MQTT_PORT`; credentials are
/// taken from `MQTT_USER`/`MQTT_PASS` when present.
pub fn run_mqtt_client(
    config: &MqttConfig,
    senders: FeedSenders,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let mqtt_host = env::var("MQTT_HOST").unwrap_or_else(|_| config.broker.clone());
    let mqtt_port = match env::var("MQTT_PORT") {
        Ok(port) => port.parse::<u16>()?,
        Err(_) => config.port,
    };

    let mut mqtt_options = build_options(config, &mqtt_host, mqtt_port);
    if let (Ok(user), Ok(pass)) = (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
        mqtt_options.set_credentials(user, pass);
    }

    let qos = qos_from_level(config.qos);
    let (client, mut connection) = Client::new(mqtt_options, 10);
    client.subscribe(config.topics.accelerometer.clone(), qos)?;
    client.subscribe(config.topics.gyroscope.clone(), qos)?;
    info!("MQTT feed connecting to {}:{}", mqtt_host, mqtt_port);

    for event in connection.iter() {
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT feed received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Some(channel) = channel_for_topic(config, &publish.topic) else {
                    continue;
                };
                match parse_sample(&publish.payload) {
                    Ok(sample) => {
                        if senders.send(channel, sample).is_err() {
                            info!("{} queue disconnected, MQTT feed exiting", channel);
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid {} sample: {}", channel, e),
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => info!("MQTT feed connected"),
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// Decodes a `{"timestamp": ns, "x": .., "y": .., "z": ..}` payload.
pub fn parse_sample(payload: &[u8]) -> Result<Sample, String> {
    let payload_str = std::str::from_utf8(payload).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    serde_json::from_str::<Sample>(payload_str).map_err(|e| format!("JSON parsing error: {}", e))
}
