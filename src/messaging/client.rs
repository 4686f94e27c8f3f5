use crate::config;
use crate::core::commands::Command;
use crate::core::events::{Event, Response, Viewer};
use crate::core::resolver::Resolver;
use crate::error::{BotError, BotResult};
use http::StatusCode;
use slack_morphism::{
    api::SlackApiChatPostMessageRequest,
    events::{SlackEventCallbackBody, SlackPushEventCallback},
    hyper_tokio::{SlackClientHyperConnector, SlackHyperClient},
    listener::{SlackClientEventsListenerEnvironment, SlackClientEventsUserState},
    SlackApiToken, SlackApiTokenValue, SlackClient, SlackClientSocketModeConfig,
    SlackClientSocketModeListener, SlackMessageContent, SlackSocketModeListenerCallbacks,
};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{error, info};

async fn push_events_socket_mode_function(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Only watch Message events for now. To be switched to match cases if we want other behaviors
    // on other event types.
    if let SlackEventCallbackBody::Message(message) = event.event {
        if message.sender.bot_id.is_some() {
            // Abort if message from bot
            return Ok(());
        }

        if let (Some(content), Some(channel_id), Some(user_id)) = (
            message.content,
            message.origin.channel,
            message.sender.user,
        ) {
            if let Some(text) = content.text {
                if !Command::is_command(&text) {
                    return Ok(());
                }
                info!("Received command in channel id {channel_id}");

                let viewer = Viewer {
                    id: user_id.to_string(),
                    // The profile display name is not part of the message
                    // payload for every workspace, fall back to the id.
                    name: message
                        .sender
                        .username
                        .unwrap_or_else(|| user_id.to_string()),
                };
                let command = Command::build_from(text);

                let ts = message.origin.ts; // to respond in thread
                let states = states.read().await;
                let sender = states
                    .get_user_state::<Arc<Sender<Event>>>()
                    .ok_or_else(|| BotError::Slack("Event sender not registered".to_string()))?;
                sender
                    .send(Event::CommandReceived(channel_id, ts, viewer, command))
                    .await
                    .map_err(|e| {
                        BotError::ChannelSend(format!("Could not send message to MPSC channel. {e}"))
                    })?;
            };
        }
    }
    Ok(())
}

fn error_handler(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> StatusCode {
    let error = BotError::Slack(err.to_string());
    error!("{error}");

    // This return value should be OK if we want to return successful ack to the Slack server using Web-sockets
    // https://api.slack.com/apis/connections/socket-implement#acknowledge
    // so that Slack knows whether to retry
    StatusCode::OK
}

pub async fn client_with_socket_mode(
    client: Arc<SlackHyperClient>,
    tx: Arc<Sender<Event>>,
) -> BotResult<()> {
    let socket_mode_callbacks =
        SlackSocketModeListenerCallbacks::new().with_push_events(push_events_socket_mode_function);

    let listener_environment = Arc::new(
        SlackClientEventsListenerEnvironment::new(client.clone())
            .with_error_handler(error_handler)
            .with_user_state(tx),
    );

    let socket_mode_listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_environment.clone(),
        socket_mode_callbacks,
    );

    let app_token_value: SlackApiTokenValue = config::SETTINGS.slack_app_token.clone().into();
    let app_token: SlackApiToken = SlackApiToken::new(app_token_value);

    socket_mode_listener
        .listen_for(&app_token)
        .await
        .map_err(|e| BotError::Slack(e.to_string()))?;

    socket_mode_listener.serve().await;

    Ok(())
}

pub async fn initialize_messaging(
    tx: Arc<Sender<Event>>,
    mut rx: Receiver<Event>,
    resolver: Resolver,
) -> BotResult<()> {
    let client = Arc::new(SlackClient::new(SlackClientHyperConnector::new()));
    let client_clone = client.clone();

    // Command responses, posted back into the originating thread.
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Event::CommandReceived(channel_id, ts, viewer, command) = event;

            let response = Response::build(&command, &viewer, &resolver).await;

            let token_value: SlackApiTokenValue = config::SETTINGS.slack_token.clone().into();
            let token: SlackApiToken = SlackApiToken::new(token_value);
            let session = client_clone.open_session(&token);

            let request = SlackApiChatPostMessageRequest::new(
                channel_id,
                SlackMessageContent::new().with_text(response.to_string()),
            )
            .with_thread_ts(ts);
            if let Err(e) = session.chat_post_message(&request).await {
                let error = BotError::Slack(e.to_string());
                error!("{error}");
            };
        }
    });

    // Handle messages from users
    client_with_socket_mode(client, tx).await?;

    Ok(())
}
