//! Web Switch Firmware
//!
//! Connects to WiFi as a station, announces itself over mDNS and serves
//! the relay control page over HTTP. The relay emulates a momentary power
//! button: `/short` pulses it for 500 ms, `/long` for 5 s.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Duration;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use esp_println::println;

use esp_webswitch::controllers::WebSwitchHttpController;
use esp_webswitch::infrastructure::drivers::{
    init_network_stack, init_switch, wait_for_connection,
};
use esp_webswitch::infrastructure::tasks::{
    http_server_task, mdns_responder_task, network_runner_task, wifi_connection_task,
};
use esp_webswitch::{indicator_gpio, mk_static, relay_gpio};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Allocate heap memory (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Relay and indicator settle at their idle levels before anything can
    // reach the HTTP surface.
    let switch = init_switch(relay_gpio!(peripherals), indicator_gpio!(peripherals));

    // Initialize network stack and spawn network tasks
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    // Wait for network connection before starting network-dependent tasks
    let ip_config = wait_for_connection(stack).await;
    println!("webswitch: up at http://{}/", ip_config.address.address());

    spawner.spawn(mdns_responder_task(stack)).ok();

    let handler = mk_static!(
        WebSwitchHttpController,
        WebSwitchHttpController::new(switch)
    );
    spawner.spawn(http_server_task(stack, handler)).ok();

    loop {
        embassy_time::Timer::after(Duration::from_secs(5)).await;
    }
}
