use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::{
    announce::{self, AnnounceError},
    handlers,
    models::{Context, Error},
};

/// Botun yardım komutlarını gösterir.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(
        "Merhaba! Bu botun özellikleri:\n\
         1. Doğum günü kaydı için \"gün ay\" formatında yazın.\n\
         2. Her gün doğum günlerini kontrol eder ve doğum günü olanlara mesaj gönderir.",
    )
    .await?;
    Ok(())
}

/// Doğum günlerini hemen kontrol eder.
#[poise::command(slash_command)]
pub async fn checkbirthdays(ctx: Context<'_>) -> Result<(), Error> {
    // Announcing runs per matching record and per guild, which can outlast
    // the window for a direct reply.
    ctx.defer().await?;

    let serenity_ctx = ctx.serenity_context();
    announce::check_today(&serenity_ctx.http, &serenity_ctx.cache, ctx.data()).await;

    ctx.say("Doğum günleri kontrol edildi.").await?;
    Ok(())
}

/// Doğum günü mesajlarını manuel olarak test eder.
#[poise::command(slash_command)]
pub async fn testbirthdays(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let serenity_ctx = ctx.serenity_context();
    announce::check_today(&serenity_ctx.http, &serenity_ctx.cache, ctx.data()).await;

    ctx.say("Doğum günü mesajları manuel olarak test edildi.")
        .await?;
    Ok(())
}

/// Geçmiş doğum günü mesajlarını kontrol edip kaydeder.
#[poise::command(slash_command)]
pub async fn syncbirthdays(ctx: Context<'_>) -> Result<(), Error> {
    // Walking the whole channel history can take longer than the
    // interaction timeout allows for a direct reply.
    ctx.defer().await?;

    match handlers::sync_birthday_history(&ctx.serenity_context().http, ctx.data()).await {
        Ok(()) => {
            ctx.say("Geçmiş doğum günü mesajları kontrol edildi ve kaydedildi.")
                .await?;
        }
        Err(e) => {
            error!("Failed to sync birthday history: {}", e);
            ctx.say("Geçmiş mesajlar kontrol edilirken bir hata oluştu.")
                .await?;
        }
    }
    Ok(())
}

/// Belirtilen tarihte doğum günü olanların doğum gününü kutlar.
#[poise::command(slash_command)]
pub async fn birthday(
    ctx: Context<'_>,
    #[description = "Kontrol edilecek tarih (gün ay formatında, örneğin: 7 haziran)"] date: String,
) -> Result<(), Error> {
    match ctx.data().dates.parse(&date) {
        Ok(date_key) => {
            ctx.defer().await?;

            let serenity_ctx = ctx.serenity_context();
            announce::check_and_announce(
                &serenity_ctx.http,
                &serenity_ctx.cache,
                ctx.data(),
                &date_key,
            )
            .await;

            ctx.say(format!(
                "Doğum günü mesajları {} tarihi için gönderildi.",
                date_key
            ))
            .await?;
        }
        Err(_) => {
            ctx.say("Lütfen \"gün ay\" formatında bir tarih girin. Örneğin: \"7 haziran\"")
                .await?;
        }
    }
    Ok(())
}

/// Belirtilen kullanıcıya doğum günü mesajı gönderir.
#[poise::command(slash_command)]
pub async fn birthdaymessage(
    ctx: Context<'_>,
    #[description = "Doğum günü mesajı gönderilecek kullanıcı"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command must be used in a server")?;

    let serenity_ctx = ctx.serenity_context();
    let wish = announce::direct_birthday_wish(user.id);

    match announce::send_celebration(
        &serenity_ctx.http,
        &serenity_ctx.cache,
        guild_id,
        ctx.data().celebration_channel,
        &wish,
    )
    .await
    {
        Ok(()) => {
            info!(
                "Sent birthday message for user {} in guild {}",
                user.id, guild_id
            );
            ctx.say(format!("Doğum günü mesajı {} için gönderildi.", user.name))
                .await?;
        }
        Err(AnnounceError::ChannelUnavailable) => {
            ctx.say("Kutlama kanalı bulunamadı.").await?;
        }
        Err(AnnounceError::PermissionDenied) => {
            ctx.say("Bu kanalda mesaj gönderme iznim yok.").await?;
        }
        Err(AnnounceError::Delivery(e)) => {
            error!("Failed to send birthday message for user {}: {}", user.id, e);
            ctx.say(format!("Mesaj gönderilemedi: {}", e)).await?;
        }
    }

    Ok(())
}
